use crate::chart::DARK_BACKGROUND;

pub const PAGE_TITLE: &str = "Fifa World Cup Match Analysis";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub fn render_page() -> String {
    format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <style>
        body {{ background: {bg}; color: white; font-family: sans-serif; margin: 0; padding: 0 10px; }}
        h1 {{ text-align: center; margin: 10px; }}
        .picker {{ display: flex; align-items: center; justify-content: center; gap: 12px; }}
        select {{ width: 230px; background: {bg}; color: white; }}
        .cards {{ display: flex; justify-content: space-around; margin: 10px; }}
        .score {{ display: flex; }}
        .graph-row {{ display: flex; justify-content: space-around; flex-wrap: wrap; }}
        .failed {{ width: 400px; height: 400px; display: flex; align-items: center; justify-content: center; color: #ff9500; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="picker">
        <h3>Select a match: </h3>
        <select id="dropdown"></select>
    </div>
    <div class="cards">
        <div><h5 id="card1"></h5></div>
        <div class="score"><p id="score-card1"></p><p id="score-card2"></p></div>
        <div><h5 id="card2"></h5></div>
    </div>
    <div class="graph-row">
        <div id="pie-card"><div id="pie-chart"></div></div>
        <div id="bar-card"><div id="bar-chart"></div></div>
    </div>
    <div class="graph-row">
        <div id="possession-card"><div id="possession-chart"></div></div>
        <div id="fouls-card"><div id="fouls-chart"></div></div>
    </div>
    <div class="graph-row">
        <div id="freekick-card"><div id="freekick-chart"></div></div>
        <div id="goalsprevented-card"><div id="goalsprevented-chart"></div></div>
    </div>
<script>
let lastGeneration = -1;
let latestRequest = 0;

function layoutFor(spec) {{
    const s = spec.style;
    const layout = {{
        title: {{ text: spec.title }},
        plot_bgcolor: s.background,
        paper_bgcolor: s.background,
        font: {{ color: s.font_color }},
        width: s.width,
        height: s.height,
    }};
    if (s.title_x !== undefined) layout.title.x = s.title_x;
    if (spec.kind === "stacked_bar") {{
        layout.barmode = "stack";
        layout.xaxis = {{ title: {{ text: spec.x_title }} }};
        layout.yaxis = {{ title: {{ text: spec.y_title }} }};
    }}
    return layout;
}}

function tracesFor(spec) {{
    if (spec.kind === "donut") {{
        return [{{
            type: "pie",
            labels: spec.slices.map(x => x.label),
            values: spec.slices.map(x => x.value),
            hole: spec.hole,
            textposition: spec.style.text_position,
            textinfo: spec.style.text_info,
            marker: {{ colors: spec.style.palette }},
        }}];
    }}
    return spec.series.map(series => ({{
        type: "bar",
        name: series.name,
        x: spec.categories,
        y: series.values,
    }}));
}}

function renderSlot(id, value) {{
    const el = document.getElementById(id);
    if (!el) return;
    if (value.type === "chart") {{
        if (el.classList.contains("failed")) {{
            el.className = "";
            el.textContent = "";
        }}
        Plotly.react(el, tracesFor(value.chart), layoutFor(value.chart));
        return;
    }}
    if (el.classList.contains("js-plotly-plot")) Plotly.purge(el);
    el.className = value.type === "failed" ? "failed" : "";
    if (value.type === "text") {{
        el.textContent = value.text;
    }} else if (value.type === "failed") {{
        el.textContent = value.error;
    }} else {{
        el.textContent = "";
    }}
}}

function apply(snapshot) {{
    if (snapshot.generation <= lastGeneration) return;
    lastGeneration = snapshot.generation;
    document.getElementById("dropdown").value = String(snapshot.selection);
    for (const [id, value] of Object.entries(snapshot.slots)) renderSlot(id, value);
}}

async function select(index) {{
    const seq = ++latestRequest;
    const resp = await fetch("/api/selection", {{
        method: "POST",
        headers: {{ "Content-Type": "application/json" }},
        body: JSON.stringify({{ index }}),
    }});
    // A newer pick was made while this one was in flight.
    if (seq !== latestRequest) return;
    if (resp.ok) apply(await resp.json());
}}

async function boot() {{
    const dropdown = document.getElementById("dropdown");
    const options = await (await fetch("/api/options")).json();
    for (const opt of options) {{
        const el = document.createElement("option");
        el.value = String(opt.value);
        el.textContent = opt.label;
        dropdown.appendChild(el);
    }}
    dropdown.addEventListener("change", () => select(Number(dropdown.value)));
    apply(await (await fetch("/api/view")).json());
}}

boot();
</script>
</body>
</html>
"####,
        title = PAGE_TITLE,
        plotly = PLOTLY_CDN,
        bg = DARK_BACKGROUND,
    )
}

#[cfg(test)]
mod tests {
    use super::render_page;

    #[test]
    fn page_drops_superseded_selection_responses() {
        let html = render_page();
        assert!(html.contains("const seq = ++latestRequest;"));
        assert!(html.contains("if (seq !== latestRequest) return;"));
        assert!(html.contains("if (snapshot.generation <= lastGeneration) return;"));
    }

    #[test]
    fn page_replaces_failed_placeholder_wholesale() {
        let html = render_page();
        let chart_branch = html
            .split("if (value.type === \"chart\")")
            .nth(1)
            .expect("chart branch present");
        let before_react = chart_branch.split("Plotly.react").next().unwrap();
        assert!(before_react.contains("el.textContent = \"\";"));
        assert!(before_react.contains("el.className = \"\";"));
        assert!(html.contains("el.className = value.type === \"failed\" ? \"failed\" : \"\";"));
        assert!(!html.contains("sort: false"));
    }
}
