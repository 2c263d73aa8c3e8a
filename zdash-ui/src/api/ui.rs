//! UI Routes - dashboard page
//!
//! A single HTML page (vanilla JS, no frameworks) that posts the credentials,
//! then draws the heatmap, collection breakdown and timeseries from the JSON
//! endpoints.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard_page))
}

/// GET /
async fn dashboard_page() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Zotero Dashboard</title>
    <style>
        body { font-family: system-ui, -apple-system, sans-serif; max-width: 1100px; margin: 24px auto; padding: 0 16px; color: #222; }
        header { display: flex; gap: 8px; align-items: center; border-bottom: 2px solid #cc2936; padding-bottom: 12px; }
        header h1 { font-size: 1.3rem; margin: 0 auto 0 0; }
        input { padding: 6px 8px; }
        button { padding: 6px 12px; border: 0; border-radius: 4px; color: white; cursor: pointer; }
        .danger { background: #dc3545; } .success { background: #198754; }
        .badge { background: white; color: #0d6efd; border-radius: 8px; padding: 0 6px; margin-left: 4px; }
        #heatmap { display: grid; grid-auto-flow: column; grid-template-rows: repeat(7, 12px); gap: 3px; margin: 12px 0; }
        .cell { width: 12px; height: 12px; background: #eeeeee; cursor: pointer; }
        .cell.on { background: #76cf63; }
        .row { display: flex; gap: 24px; }
        .row > section { flex: 1; }
        .bar { display: flex; gap: 6px; align-items: center; cursor: pointer; margin: 2px 0; }
        .bar span.fill { background: #0d6efd; height: 10px; }
        details { border-bottom: 1px solid #ddd; padding: 6px 0; }
        svg { width: 100%; height: 200px; border-left: 1px solid black; border-bottom: 1px solid black; }
    </style>
</head>
<body>
    <header>
        <h1>Zotero Dashboard</h1>
        <input id="library_id" type="number" placeholder="Zotero Library ID" title="This is your userID from your Zotero account.">
        <input id="api_key" type="text" placeholder="Zotero API Key" title="This is your web API key for your Zotero account.">
        <select id="library_type" title="Personal library or group library">
            <option value="user">User</option>
            <option value="group">Group</option>
        </select>
        <button id="status_button" class="danger">No Data Found</button>
    </header>

    <h3 id="heatmap_title">No Data Selected</h3>
    <div id="heatmap"></div>
    <h4 id="day_title">Select a Date on the Heatmap</h4>
    <div id="day_sources"></div>
    <hr>

    <h4>Breakdown of sources read by category</h4>
    <div class="row">
        <section id="collection_counts"></section>
        <section><h5 id="collection_title"></h5><svg id="collection_timeseries"></svg></section>
    </div>
    <hr>

    <h4>Total sources read overtime</h4>
    <svg id="total_timeseries"></svg>

    <p><small id="footer">zdash-ui</small></p>

<script>
const $ = (id) => document.getElementById(id);

// Library content is untrusted: text goes through textContent only
function el(tag, text, className) {
    const node = document.createElement(tag);
    if (text !== undefined && text !== null) node.textContent = text;
    if (className) node.className = className;
    return node;
}

function safeUrl(value) {
    try {
        const url = new URL(value, window.location.href);
        return url.protocol === "http:" || url.protocol === "https:" ? url.href : null;
    } catch (e) {
        return null;
    }
}

async function api(path, options) {
    const response = await fetch(path, options);
    const body = await response.json();
    if (!response.ok) throw new Error(body.error ? body.error.message : response.statusText);
    return body;
}

function showStatus(status) {
    const button = $("status_button");
    button.className = status.color;
    button.replaceChildren(document.createTextNode(status.label));
    if (status.found) button.appendChild(el("span", String(status.item_count), "badge"));
}

async function connect() {
    const libraryId = parseInt($("library_id").value, 10);
    const apiKey = $("api_key").value.trim();
    if (!libraryId || !apiKey) return;
    try {
        const status = await api("/api/library/connect", {
            method: "POST",
            headers: { "Content-Type": "application/json" },
            body: JSON.stringify({
                library_id: libraryId,
                api_key: apiKey,
                library_type: $("library_type").value,
            }),
        });
        showStatus(status);
        if (status.found) refresh();
    } catch (e) {
        showStatus({ found: false, label: "No Data Found", color: "danger" });
        console.error(e);
    }
}

function drawHeatmap(data) {
    $("heatmap_title").textContent = data.title;
    const grid = $("heatmap");
    grid.replaceChildren();
    for (const cell of data.heatmap.cells) {
        const div = document.createElement("div");
        div.className = cell.count > 0 ? "cell on" : "cell";
        div.style.gridColumn = cell.week + 1;
        div.style.gridRow = cell.weekday + 1;
        div.title = cell.hover;
        div.onclick = () => showDay(cell.label);
        grid.appendChild(div);
    }
}

async function showDay(label) {
    const data = await api(`/api/day?label=${encodeURIComponent(label)}`);
    $("day_title").textContent = data.title;
    const list = $("day_sources");
    list.replaceChildren();
    for (const source of data.sources) {
        const details = el("details");
        details.appendChild(el("summary", source.header));

        const heading = el("h3");
        const href = source.url ? safeUrl(source.url) : null;
        if (href) {
            const link = el("a", source.title || "");
            link.href = href;
            link.rel = "noopener noreferrer";
            link.target = "_blank";
            heading.appendChild(link);
        } else {
            heading.textContent = source.title || "";
        }

        const body = el("div");
        body.appendChild(heading);
        body.appendChild(el("h4", source.collection_name || ""));
        for (const author of source.authors) {
            const line = el("div");
            line.appendChild(el("b", author.creator_type));
            line.appendChild(document.createTextNode(`: ${author.name}`));
            body.appendChild(line);
        }
        body.appendChild(el("p", source.abstract_note || ""));
        details.appendChild(body);
        list.appendChild(details);
    }
}

function drawCounts(data) {
    const section = $("collection_counts");
    section.replaceChildren();
    const max = Math.max(1, ...data.counts.map(c => c.count));
    for (const c of data.counts) {
        const row = el("div", null, "bar");
        const fill = el("span", null, "fill");
        fill.style.width = `${Math.round(200 * c.count / max)}px`;
        row.appendChild(fill);
        row.appendChild(document.createTextNode(`${c.name} (${c.count})`));
        row.onclick = () => showCollection(c.name);
        section.appendChild(row);
    }
}

function drawLines(svg, series) {
    svg.replaceChildren();
    const points = series.map(s => s.values);
    const length = Math.max(0, ...points.map(p => p.length));
    const max = Math.max(1, ...points.flat());
    const colors = ["#0d6efd", "#dc3545", "#198754", "#fd7e14", "#6f42c1", "#20c997"];
    series.forEach((s, i) => {
        const coords = s.values.map((v, x) =>
            `${(x / Math.max(1, length - 1)) * 1000},${200 - (v / max) * 190}`).join(" ");
        const line = document.createElementNS("http://www.w3.org/2000/svg", "polyline");
        line.setAttribute("points", coords);
        line.setAttribute("fill", "none");
        line.setAttribute("stroke", colors[i % colors.length]);
        const title = document.createElementNS("http://www.w3.org/2000/svg", "title");
        title.textContent = s.name;
        line.appendChild(title);
        svg.appendChild(line);
    });
    svg.setAttribute("viewBox", "0 0 1000 200");
    svg.setAttribute("preserveAspectRatio", "none");
}

async function showCollection(name) {
    const data = await api(`/api/collections/timeseries?name=${encodeURIComponent(name)}`);
    $("collection_title").textContent = data.title;
    drawLines($("collection_timeseries"), data.timeseries.series);
}

async function refresh() {
    drawHeatmap(await api("/api/heatmap"));
    drawCounts(await api("/api/collections/counts"));
    const total = await api("/api/timeseries/total");
    drawLines($("total_timeseries"), total.timeseries.series);
}

async function init() {
    const build = await api("/api/buildinfo");
    $("footer").textContent = `zdash-ui v${build.version} (${build.git_hash})`;
    const status = await api("/api/library/status");
    showStatus(status);
    if (status.found) refresh();
}

$("library_id").addEventListener("change", connect);
$("api_key").addEventListener("change", connect);
$("library_type").addEventListener("change", connect);
init();
</script>
</body>
</html>
"##;
