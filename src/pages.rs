//! Server-rendered HTML for the dashboard screens.

use common::{available_years, display_name, NO_DATA_MESSAGE};

use crate::charts::render_script;
use crate::schemas::ChartResponse;
use crate::screens::Screen;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const CHART_ELEMENT: &str = "chart";

/// What to show below a screen's form.
#[derive(Debug, Default)]
pub enum Outcome {
    /// Nothing was requested yet
    #[default]
    Idle,
    /// A rendered chart with the link of its CSV download
    Chart {
        chart: ChartResponse,
        csv_href: String,
        image_scale: u32,
    },
    /// The query returned no rows
    NoData,
    /// The query failed
    Failed(String),
}

/// Form state of the per-region screen.
#[derive(Debug, Default)]
pub struct RegionForm<'a> {
    pub regions: &'a [String],
    pub selected: Option<&'a str>,
    pub forecast: bool,
}

/// Form state of the province screen.
#[derive(Debug, Default)]
pub struct ProvinceForm {
    pub year: Option<i32>,
    pub forecast: bool,
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `text` as a JavaScript string literal, escaped for an HTML attribute.
fn js_string_attr(text: &str) -> String {
    escape_html(&serde_json::Value::String(text.to_string()).to_string())
}

fn styles() -> &'static str {
    r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px auto;
            max-width: 1100px;
            background-color: #f5f5f5;
            color: #262730;
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #ff4b4b;
            padding-bottom: 10px;
        }
        form, .panel {
            background: white;
            padding: 16px;
            margin-bottom: 16px;
            border-radius: 6px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        button, .button {
            background-color: white;
            border: 1px solid #d0d0d5;
            border-radius: 6px;
            padding: 8px 14px;
            margin: 4px 8px 4px 0;
            color: #262730;
            cursor: pointer;
            text-decoration: none;
            display: inline-block;
            font-size: 14px;
        }
        button:hover, .button:hover {
            border-color: #ff4b4b;
            color: #ff4b4b;
        }
        select {
            padding: 6px;
            min-width: 240px;
        }
        .columns {
            display: flex;
            gap: 16px;
        }
        .message {
            color: #555;
            font-style: italic;
        }
        .error {
            color: #c62828;
        }
        #chart {
            width: 100%;
            min-height: 560px;
        }
    "#
}

/// Full HTML document around a screen body.
pub fn layout(title: &str, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"id\">\n");
    html.push_str("<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    html.push_str(&format!("    <script src=\"{}\"></script>\n", PLOTLY_JS));
    html.push_str("    <style>");
    html.push_str(styles());
    html.push_str("</style>\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    html.push_str(&format!("    <h1>{}</h1>\n", escape_html(title)));
    html.push_str(body);
    html.push_str("</body>\n");
    html.push_str("</html>\n");
    html
}

fn screen_href(screen: Screen) -> String {
    format!("/?screen={}", screen.key())
}

fn back_link() -> String {
    format!(
        "    <p><a class=\"button\" href=\"{}\">Kembali</a></p>\n",
        screen_href(Screen::Menu)
    )
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        "<label><input type=\"checkbox\" name=\"{}\"{}> {}</label>",
        name,
        if checked { " checked" } else { "" },
        label
    )
}

fn render_outcome(outcome: &Outcome, download_label: &str) -> String {
    match outcome {
        Outcome::Idle => String::new(),
        Outcome::NoData => format!("    <p class=\"message\">{}</p>\n", NO_DATA_MESSAGE),
        Outcome::Failed(message) => format!(
            "    <p class=\"message error\">Gagal memuat data: {}</p>\n",
            escape_html(message)
        ),
        Outcome::Chart {
            chart,
            csv_href,
            image_scale,
        } => {
            let stem = chart.file_name.trim_end_matches(".png");
            let mut html = String::new();
            html.push_str("    <div class=\"panel\">\n");
            html.push_str(&format!("        <div id=\"{}\"></div>\n", CHART_ELEMENT));
            html.push_str(&format!(
                "        <button type=\"button\" onclick=\"Plotly.downloadImage({}, {{format: 'png', filename: {}, scale: {}}})\">{}</button>\n",
                js_string_attr(CHART_ELEMENT),
                js_string_attr(stem),
                image_scale,
                escape_html(download_label)
            ));
            html.push_str(&format!(
                "        <a class=\"button\" href=\"{}\" download=\"{}.csv\">Download CSV</a>\n",
                escape_html(csv_href),
                escape_html(stem)
            ));
            html.push_str("    </div>\n");
            // `</` inside the figure JSON would end the script element early
            let script = render_script(CHART_ELEMENT, chart).replace("</", "<\\/");
            html.push_str(&format!("    <script>{}</script>\n", script));
            html
        }
    }
}

/// `awal`: welcome text and a way into the menu.
pub fn landing() -> String {
    let body = format!(
        concat!(
            "    <div class=\"panel\">\n",
            "        <p>Dashboard jumlah penduduk miskin kabupaten/kota di Provinsi Jawa Timur.</p>\n",
            "        <p>Data dalam ribu jiwa, tahun 2007 sampai 2024.</p>\n",
            "        <a class=\"button\" href=\"{}\">Mulai</a>\n",
            "    </div>\n"
        ),
        screen_href(Screen::Menu)
    );
    layout("Jumlah Penduduk Miskin Jawa Timur", &body)
}

/// `menu`: the two chart screens side by side.
pub fn menu() -> String {
    let body = format!(
        concat!(
            "    <p>Pilih menu untuk melanjutkan:</p>\n",
            "    <div class=\"columns\">\n",
            "        <a class=\"button\" href=\"{}\">Grafik Per Daerah</a>\n",
            "        <a class=\"button\" href=\"{}\">Grafik Se-Jawa Timur</a>\n",
            "    </div>\n"
        ),
        screen_href(Screen::PerRegion),
        screen_href(Screen::Province)
    );
    layout("Menu Utama", &body)
}

/// `perdaerah`: region selector with an optional forecast.
pub fn per_region(form: &RegionForm<'_>, outcome: &Outcome) -> String {
    let mut body = String::new();
    body.push_str("    <form method=\"get\" action=\"/\">\n");
    body.push_str(&format!(
        "        <input type=\"hidden\" name=\"screen\" value=\"{}\">\n",
        Screen::PerRegion.key()
    ));
    body.push_str("        <p><label>Pilih Daerah <select name=\"region\">");
    for region in form.regions {
        let selected = if form.selected == Some(region.as_str()) {
            " selected"
        } else {
            ""
        };
        body.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            escape_html(region),
            selected,
            escape_html(&display_name(region))
        ));
    }
    body.push_str("</select></label></p>\n");
    body.push_str(&format!(
        "        <p>{}</p>\n",
        checkbox("forecast", "Tampilkan prediksi 3 tahun", form.forecast)
    ));
    body.push_str(
        "        <button type=\"submit\" name=\"action\" value=\"generate\">Generate</button>\n",
    );
    body.push_str("    </form>\n");
    body.push_str(&render_outcome(outcome, "Download Grafik Batang"));
    body.push_str(&back_link());
    layout("Grafik Per Daerah", &body)
}

/// `sejawatimur`: year pie, province bar and all-years pie.
pub fn province(form: &ProvinceForm, outcome: &Outcome, download_label: &str) -> String {
    let mut body = String::new();
    body.push_str("    <form method=\"get\" action=\"/\">\n");
    body.push_str(&format!(
        "        <input type=\"hidden\" name=\"screen\" value=\"{}\">\n",
        Screen::Province.key()
    ));
    body.push_str("        <p><label>Pilih Tahun <select name=\"year\">");
    for year in available_years() {
        let selected = if form.year == Some(year) { " selected" } else { "" };
        body.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            year, selected, year
        ));
    }
    body.push_str("</select></label></p>\n");
    body.push_str(&format!(
        "        <p>{}</p>\n",
        checkbox("forecast", "Tampilkan prediksi 3 tahun pada grafik batang", form.forecast)
    ));
    body.push_str(
        "        <button type=\"submit\" name=\"action\" value=\"pie\">Generate Grafik Lingkaran</button>\n",
    );
    body.push_str(
        "        <button type=\"submit\" name=\"action\" value=\"bar\">Generate Grafik Batang Total Jawa Timur</button>\n",
    );
    body.push_str(
        "        <button type=\"submit\" name=\"action\" value=\"total\">Generate Grafik Lingkaran Total Semua Tahun</button>\n",
    );
    body.push_str("    </form>\n");
    body.push_str(&render_outcome(outcome, download_label));
    body.push_str(&back_link());
    layout("Grafik Se-Jawa Timur", &body)
}

/// Any unknown `screen` value.
pub fn not_found() -> String {
    let body = format!(
        "    <p class=\"message\">Halaman tidak ditemukan.</p>\n{}",
        back_link()
    );
    layout("Halaman tidak ditemukan.", &body)
}
