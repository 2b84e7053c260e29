// HTML dashboard rendering
// Writes the dashboard view as a single self-contained HTML document with
// an inline SVG line chart
//
// Numan Thabit 2025 Nov

use crate::dashboard::{
    ChartData, DashboardView, MetricFilter, SortColumn, SortOrder, SummaryCard,
};
use crate::source::{DataSource, NoticeLevel};
use std::fmt::{self, Write};
use url::form_urlencoded;

const CHART_WIDTH: f64 = 960.0;
const CHART_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MAX_X_LABELS: usize = 8;

pub fn render_dashboard(view: &DashboardView) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(32 * 1024);
    HtmlGenerator::new(&mut out, view).generate()?;
    Ok(out)
}

pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

struct HtmlGenerator<'a, W: Write> {
    writer: &'a mut W,
    view: &'a DashboardView,
}

impl<'a, W: Write> HtmlGenerator<'a, W> {
    fn new(writer: &'a mut W, view: &'a DashboardView) -> Self {
        Self { writer, view }
    }

    fn generate(&mut self) -> fmt::Result {
        self.write_head()?;
        writeln!(self.writer, "<body>")?;
        self.write_header()?;
        self.write_notice()?;
        self.write_cards()?;
        self.write_chart()?;
        self.write_table()?;
        writeln!(self.writer, "</body>")?;
        writeln!(self.writer, "</html>")
    }

    /// Query string for a link that keeps the current selection.
    fn link(&self, metric: MetricFilter, sort: Option<(SortColumn, &str)>) -> String {
        let mut q = form_urlencoded::Serializer::new(String::new());
        q.append_pair("extension", &self.view.extension_name);
        q.append_pair("metric", metric.key());
        if let Some((column, order)) = sort {
            q.append_pair("sort", column.key());
            q.append_pair("order", order);
        }
        format!("?{}", q.finish())
    }

    fn write_head(&mut self) -> fmt::Result {
        writeln!(self.writer, "<!DOCTYPE html>")?;
        writeln!(self.writer, "<html lang=\"en\">")?;
        writeln!(self.writer, "<head>")?;
        writeln!(self.writer, "<meta charset=\"UTF-8\">")?;
        writeln!(
            self.writer,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(
            self.writer,
            "<title>{} statistics</title>",
            html_escape(&self.view.extension_name)
        )?;
        writeln!(self.writer, "<style>")?;
        writeln!(self.writer, "body {{ font-family: system-ui, sans-serif; margin: 2rem; color: #0f172a; background: #f8fafc; }}")?;
        writeln!(self.writer, "header {{ display: flex; flex-wrap: wrap; justify-content: space-between; gap: 1rem; margin-bottom: 2rem; }}")?;
        writeln!(self.writer, "h1 {{ margin: 0 0 .25rem; font-size: 1.875rem; }}")?;
        writeln!(self.writer, ".muted {{ color: #64748b; }}")?;
        writeln!(self.writer, ".notice {{ padding: .75rem 1rem; border-radius: .375rem; margin-bottom: 1.5rem; }}")?;
        writeln!(self.writer, ".notice.info {{ background: #e0f2fe; }} .notice.success {{ background: #dcfce7; }} .notice.error {{ background: #fee2e2; color: #991b1b; }}")?;
        writeln!(self.writer, ".cards {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; margin-bottom: 2rem; }}")?;
        writeln!(self.writer, ".card {{ background: #fff; border: 1px solid #e2e8f0; border-radius: .5rem; padding: 1rem 1.25rem; }}")?;
        writeln!(self.writer, ".card .value {{ font-size: 1.5rem; font-weight: 700; }}")?;
        writeln!(self.writer, ".trend {{ font-size: .75rem; margin-top: .25rem; }} .trend.up {{ color: #059669; }} .trend.down {{ color: #dc2626; }} .trend.flat {{ color: #64748b; }}")?;
        writeln!(self.writer, ".tabs a {{ margin-right: .75rem; text-decoration: none; color: #334155; }} .tabs a.active {{ font-weight: 700; border-bottom: 2px solid #334155; }}")?;
        writeln!(self.writer, "table {{ width: 100%; border-collapse: collapse; }} th, td {{ text-align: left; padding: .5rem; border-bottom: 1px solid #e2e8f0; }}")?;
        writeln!(self.writer, "th a {{ color: inherit; text-decoration: none; }}")?;
        writeln!(self.writer, "</style>")?;
        writeln!(self.writer, "</head>")
    }

    fn write_header(&mut self) -> fmt::Result {
        let view = self.view;
        writeln!(self.writer, "<header>")?;
        writeln!(self.writer, "<div>")?;
        writeln!(self.writer, "<h1>{}</h1>", html_escape(&view.extension_name))?;
        writeln!(
            self.writer,
            "<p class=\"muted\">By {} &bull; {} days of statistics</p>",
            html_escape(&view.publisher_name),
            view.stat_count
        )?;
        writeln!(self.writer, "</div>")?;

        if view.selector.is_visible() {
            writeln!(self.writer, "<form method=\"get\">")?;
            writeln!(
                self.writer,
                "<label for=\"extension-select\" class=\"muted\">Select Extension</label>"
            )?;
            writeln!(
                self.writer,
                "<select id=\"extension-select\" name=\"extension\" onchange=\"this.form.submit()\">"
            )?;
            if !view.selector.has_selected_option() {
                writeln!(
                    self.writer,
                    "<option value=\"{}\" selected>{}</option>",
                    html_escape(&view.selector.selected),
                    html_escape(&view.selector.selected_label)
                )?;
            }
            for ext in &view.selector.options {
                let selected = if ext.extension_name == view.selector.selected {
                    " selected"
                } else {
                    ""
                };
                let label = if ext.display_name.is_empty() {
                    &ext.extension_name
                } else {
                    &ext.display_name
                };
                writeln!(
                    self.writer,
                    "<option value=\"{}\"{selected}>{} ({})</option>",
                    html_escape(&ext.extension_name),
                    html_escape(label),
                    html_escape(&ext.extension_name)
                )?;
            }
            writeln!(self.writer, "</select>")?;
            writeln!(
                self.writer,
                "<input type=\"hidden\" name=\"metric\" value=\"{}\">",
                view.chart.filter.key()
            )?;
            writeln!(self.writer, "<noscript><button type=\"submit\">Show</button></noscript>")?;
            writeln!(self.writer, "</form>")?;
        }
        writeln!(self.writer, "</header>")
    }

    fn write_notice(&mut self) -> fmt::Result {
        let class = match self.view.notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        };
        let source = match self.view.source {
            DataSource::Live => "live",
            DataSource::Mock => "mock",
        };
        writeln!(
            self.writer,
            "<div class=\"notice {class}\" data-source=\"{source}\">{}</div>",
            html_escape(&self.view.notice.message)
        )
    }

    fn write_cards(&mut self) -> fmt::Result {
        let view = self.view;
        writeln!(self.writer, "<section class=\"cards\">")?;
        for card in &view.cards {
            self.write_card(card)?;
        }
        writeln!(self.writer, "</section>")
    }

    fn write_card(&mut self, card: &SummaryCard) -> fmt::Result {
        let class = match card.trend.signum() {
            1 => "up",
            -1 => "down",
            _ => "flat",
        };
        writeln!(self.writer, "<div class=\"card\">")?;
        writeln!(self.writer, "<div class=\"muted\">{}</div>", card.title)?;
        writeln!(
            self.writer,
            "<div class=\"value\">{}</div>",
            group_thousands(card.value)
        )?;
        writeln!(
            self.writer,
            "<div class=\"trend {class}\">{} {}% {}</div>",
            card.direction.arrow(),
            card.trend.unsigned_abs(),
            card.trend_label
        )?;
        writeln!(self.writer, "</div>")
    }

    fn write_chart(&mut self) -> fmt::Result {
        let view = self.view;
        let chart = &view.chart;
        let sort = view.table.sort.map(|s| (s.column, s.order.key()));
        writeln!(self.writer, "<section class=\"card\">")?;
        writeln!(self.writer, "<h2>Metrics Over Time</h2>")?;
        writeln!(self.writer, "<nav class=\"tabs\">")?;
        for tab in MetricFilter::tabs() {
            let active = if tab == chart.filter { " class=\"active\"" } else { "" };
            let href = html_escape(&self.link(tab, sort));
            writeln!(
                self.writer,
                "<a href=\"{href}\"{active}>{}</a>",
                tab.label()
            )?;
        }
        writeln!(self.writer, "</nav>")?;
        write_svg_chart(self.writer, chart)?;
        writeln!(self.writer, "</section>")
    }

    fn write_table(&mut self) -> fmt::Result {
        let view = self.view;
        let table = &view.table;
        writeln!(self.writer, "<section class=\"card\">")?;
        writeln!(self.writer, "<h2>Daily Statistics</h2>")?;
        writeln!(self.writer, "<table>")?;
        writeln!(self.writer, "<thead><tr>")?;
        for column in SortColumn::ALL {
            let next = table.next_order(column);
            let marker = match table.sort {
                Some(s) if s.column == column => match s.order {
                    SortOrder::Asc => " ▲",
                    SortOrder::Desc => " ▼",
                },
                _ => "",
            };
            let href = self.link(view.chart.filter, Some((column, next.key())));
            writeln!(
                self.writer,
                "<th><a href=\"{}\">{}{marker}</a></th>",
                html_escape(&href),
                column.title()
            )?;
        }
        writeln!(self.writer, "</tr></thead>")?;
        writeln!(self.writer, "<tbody>")?;
        for row in &table.rows {
            writeln!(
                self.writer,
                "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&row.date),
                row.page_views,
                row.installs,
                row.downloads,
                row.uninstalls,
                row.rating_text()
            )?;
        }
        writeln!(self.writer, "</tbody>")?;
        writeln!(self.writer, "</table>")?;
        writeln!(self.writer, "</section>")
    }
}

fn write_svg_chart<W: Write>(w: &mut W, chart: &ChartData) -> fmt::Result {
    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_max = chart.y_max() as f64;
    let n = chart.labels.len();

    let x_at = |i: usize| -> f64 {
        if n <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |v: u64| -> f64 { MARGIN_TOP + plot_h - (v as f64 / y_max) * plot_h };

    writeln!(
        w,
        "<svg viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" width=\"100%\" role=\"img\" aria-label=\"{}\">",
        chart.filter.label()
    )?;

    for tick in &chart.y_ticks {
        let y = y_at(*tick);
        writeln!(
            w,
            "<line x1=\"{MARGIN_LEFT}\" x2=\"{:.1}\" y1=\"{y:.1}\" y2=\"{y:.1}\" stroke=\"#e2e8f0\"/>",
            CHART_WIDTH - MARGIN_RIGHT
        )?;
        writeln!(
            w,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" fill=\"#64748b\">{tick}</text>",
            MARGIN_LEFT - 6.0,
            y + 4.0
        )?;
    }

    let every = n.div_ceil(MAX_X_LABELS).max(1);
    for (i, label) in chart.labels.iter().enumerate() {
        if i % every != 0 && i + 1 != n {
            continue;
        }
        writeln!(
            w,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\" fill=\"#64748b\">{}</text>",
            x_at(i),
            CHART_HEIGHT - MARGIN_BOTTOM + 18.0,
            html_escape(label)
        )?;
    }

    for series in &chart.series {
        let points: Vec<String> = series
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
            .collect();
        writeln!(
            w,
            "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"2\" points=\"{}\"><title>{}</title></polyline>",
            series.border_color,
            points.join(" "),
            series.label
        )?;
        for (i, v) in series.data.iter().enumerate() {
            writeln!(
                w,
                "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\"><title>{}: {v}</title></circle>",
                x_at(i),
                y_at(*v),
                series.border_color,
                html_escape(&chart.labels[i])
            )?;
        }
    }

    writeln!(w, "</svg>")
}
