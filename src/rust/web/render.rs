//! HTML for both pages, built as plain strings.

use std::fmt::Write;

use axum::http::StatusCode;
use serde_json::Value;

use crate::classifier::{Personality, Tone};
use crate::dataset::{DatasetError, DatasetPreview};
use crate::features::{
    Answer, FeatureRecord, PredictionForm, SelectSpec, SliderSpec, DRAINED_AFTER_SOCIALIZING,
    FEATURE_NAMES, STAGE_FEAR,
};
use crate::predictor::{ClassProbability, Prediction};
use crate::report::EvaluationReport;

const LOTTIE_PLAYER: &str = "https://unpkg.com/lottie-web@5.12.2/build/player/lottie.min.js";

const STYLE: &str = r#"
        *, *::before, *::after { box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
            margin: 0; color: #111827; background: #ffffff; line-height: 1.6;
        }
        nav { display: flex; gap: 1rem; padding: 0.75rem 1.25rem; border-bottom: 1px solid #e8ebf0; }
        nav a { color: #2563eb; text-decoration: none; font-size: 0.875rem; }
        .page { max-width: 720px; margin: 0 auto; padding: 2rem 1.25rem 4rem; }
        .page.wide { max-width: 1100px; }
        .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
        .field { margin-bottom: 1rem; }
        .field label { display: block; font-size: 0.8125rem; font-weight: 500; color: #4b5563; }
        .field input[type="range"] { width: 80%; vertical-align: middle; }
        .field output { font-family: monospace; margin-left: 0.5rem; }
        .field select { width: 100%; padding: 0.375rem; }
        button { width: 100%; padding: 0.625rem; border: none; border-radius: 6px;
                 background: #111827; color: #fff; font-size: 0.9375rem; cursor: pointer; }
        .alert { padding: 0.75rem 1rem; border-radius: 6px; margin: 1rem 0; }
        .alert.success { background: #f0fdf4; border: 1px solid #bbf7d0; }
        .alert.info { background: #eff6ff; border: 1px solid #bfdbfe; }
        .alert.error { background: #fef2f2; border: 1px solid #fecaca; }
        .bar-row { display: grid; grid-template-columns: 8rem 1fr 4rem; gap: 0.5rem; align-items: center; }
        .bar { background: #eef0f4; height: 1.25rem; border-radius: 4px; overflow: hidden; }
        .bar-fill { background: #2563eb; height: 100%; }
        table { border-collapse: collapse; font-size: 0.8125rem; }
        th, td { border: 1px solid #e8ebf0; padding: 0.25rem 0.5rem; text-align: right; }
        pre { background: #f7f8fa; padding: 1rem; overflow-x: auto; }
"#;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, icon: &str, wide: bool, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>{icon}</text></svg>">
    <style>{STYLE}</style>
</head>
<body>
<nav><a href="/">🧠 Personality Predictor</a><a href="/model">📊 Penjelasan Model</a></nav>
<main class="page{wide}">
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        icon = icon,
        wide = if wide { " wide" } else { "" },
        body = body,
    )
}

/// Data needed to draw the prediction page.
#[derive(Debug, Default)]
pub struct FormView<'a> {
    pub form: PredictionForm,
    pub animation: Option<&'a Value>,
    pub model_error: Option<&'a str>,
    pub prediction: Option<&'a Prediction>,
}

fn slider(spec: &SliderSpec, value: f32) -> String {
    format!(
        r#"<div class="field">
    <label for="{name}">{label}</label>
    <input type="range" id="{name}" name="{name}" min="{min:.1}" max="{max:.1}" step="{step}" value="{value:.1}" oninput="this.nextElementSibling.value = Number(this.value).toFixed(1)">
    <output>{value:.1}</output>
</div>
"#,
        name = spec.name,
        label = escape(spec.label),
        min = spec.min,
        max = spec.max,
        step = spec.step,
        value = value,
    )
}

fn select(spec: &SelectSpec, selected: Answer) -> String {
    let mut options = String::new();
    for answer in Answer::OPTIONS {
        let _ = write!(
            options,
            r#"<option value="{0}"{1}>{0}</option>"#,
            answer.as_str(),
            if answer == selected { " selected" } else { "" }
        );
    }
    format!(
        r#"<div class="field">
    <label for="{name}">{label}</label>
    <select id="{name}" name="{name}">{options}</select>
</div>
"#,
        name = spec.name,
        label = escape(spec.label),
        options = options,
    )
}

fn animation_block(animation: &Value) -> String {
    // `</` inside the JSON would end the script element early
    let data = animation.to_string().replace("</", "<\\/");
    format!(
        r#"<div id="animation" style="height: 200px"></div>
<script src="{LOTTIE_PLAYER}"></script>
<script>
lottie.loadAnimation({{
    container: document.getElementById("animation"),
    renderer: "svg", loop: true, autoplay: true,
    animationData: {data}
}});
</script>
"#
    )
}

/// The prediction page: intro, optional animation, form, and result when present.
pub fn form_page(view: &FormView<'_>) -> String {
    let mut body = String::from(
        r#"<h1>🧠 Personality Predictor</h1>
<p>Aplikasi ini menggunakan model <em>Random Forest Classifier</em> untuk memprediksi tipe kepribadian seseorang (Introvert atau Ekstrovert) berdasarkan beberapa kebiasaan sosial.</p>
"#,
    );

    if let Some(message) = view.model_error {
        let _ = writeln!(body, r#"<div class="alert error" role="alert">{}</div>"#, escape(message));
    }
    if let Some(animation) = view.animation {
        body.push_str(&animation_block(animation));
    }

    let [alone, social, outside, friends, posts] = view.form.sliders();
    let _ = write!(
        body,
        r#"<h2>Masukkan Data Anda</h2>
<form method="post" action="/predict" id="personality_form">
<div class="columns">
<div>
{}{}{}{}</div>
<div>
{}{}{}</div>
</div>
<button type="submit">✨ Prediksi Kepribadian</button>
</form>
"#,
        slider(&alone.0, alone.1),
        select(&STAGE_FEAR, view.form.stage_fear),
        slider(&social.0, social.1),
        slider(&outside.0, outside.1),
        select(&DRAINED_AFTER_SOCIALIZING, view.form.drained_after_socializing),
        slider(&friends.0, friends.1),
        slider(&posts.0, posts.1),
    );

    if let Some(prediction) = view.prediction {
        body.push_str(&result_section(prediction));
    }

    layout("Personality Predictor", "🧠", false, &body)
}

/// Headline, image and description for the predicted personality, then the chart and raw input.
pub fn result_section(prediction: &Prediction) -> String {
    let profile = prediction.personality.profile();
    let tone = match profile.tone {
        Tone::Success => "success",
        Tone::Info => "info",
    };
    let personality_class = match prediction.personality {
        Personality::Introvert => "introvert",
        Personality::Extrovert => "extrovert",
    };

    format!(
        r#"<section id="result" class="{personality_class}">
<h2>🎉 Hasil Prediksi</h2>
<div class="alert {tone}">{headline}</div>
<img src="{image}" width="150" alt="{personality}">
<p>{description}</p>
<h3>Probabilitas Prediksi</h3>
{chart}
<details>
<summary>Lihat Detail Data Input</summary>
{record}
</details>
</section>
"#,
        headline = escape(profile.headline),
        image = escape(profile.image_url),
        personality = prediction.personality,
        description = escape(profile.description),
        chart = probability_chart(&prediction.probabilities),
        record = record_table(&prediction.record),
    )
}

/// Horizontal bar chart of class probabilities, one bar per class in `classes` order.
pub fn probability_chart(probabilities: &[ClassProbability]) -> String {
    let mut out = String::from(r#"<div class="chart" aria-label="Tipe Kepribadian vs Probabilitas">"#);
    out.push('\n');
    for entry in probabilities {
        let percent = f64::from(entry.probability) * 100.0;
        let _ = writeln!(
            out,
            r#"<div class="bar-row" data-label="{label}" data-probability="{probability}"><span>{label}</span><div class="bar"><div class="bar-fill" style="width: {percent:.1}%"></div></div><span>{percent:.1}%</span></div>"#,
            label = escape(&entry.label),
            probability = entry.probability,
            percent = percent,
        );
    }
    out.push_str("</div>\n");
    out
}

fn record_cells(record: &FeatureRecord) -> [String; 7] {
    [
        format!("{:.1}", record.time_spent_alone),
        record.stage_fear.to_string(),
        format!("{:.1}", record.social_event_attendance),
        format!("{:.1}", record.going_outside),
        record.drained_after_socializing.to_string(),
        format!("{:.1}", record.friends_circle_size),
        format!("{:.1}", record.post_frequency),
    ]
}

fn record_table(record: &FeatureRecord) -> String {
    let header: String = FEATURE_NAMES.iter().map(|name| format!("<th>{}</th>", name)).collect();
    let cells: String = record_cells(record).iter().map(|v| format!("<td>{}</td>", v)).collect();
    format!("<table class=\"record\">\n<tr><th></th>{}</tr>\n<tr><th>0</th>{}</tr>\n</table>", header, cells)
}

fn dataset_section(preview: &Result<DatasetPreview, DatasetError>) -> String {
    match preview {
        Ok(preview) => {
            let mut out = String::from("<table class=\"dataset\">\n<tr><th></th>");
            for header in &preview.headers {
                let _ = write!(out, "<th>{}</th>", escape(header));
            }
            out.push_str("</tr>\n");
            for (i, row) in preview.rows.iter().enumerate() {
                let _ = write!(out, "<tr><th>{}</th>", i);
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", escape(cell));
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</table>\n");
            out
        }
        Err(DatasetError::NotFound(path)) => {
            let file = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
            let folder = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
                _ => ".".to_string(),
            };
            format!(
                "<div class=\"alert error\" role=\"alert\">{}</div>\n",
                escape(&format!("File dataset '{}' tidak ditemukan di folder '{}/'.", file, folder))
            )
        }
        Err(e) => format!("<div class=\"alert error\" role=\"alert\">{}</div>\n", escape(&e.to_string())),
    }
}

/// The static explanation page with dataset preview and evaluation report.
pub fn explanation_page(preview: &Result<DatasetPreview, DatasetError>, report: &EvaluationReport) -> String {
    let features: String = FEATURE_NAMES.iter()
        .map(|name| format!("<li><code>{}</code></li>\n", name))
        .collect();
    let extrovert = report.class_metrics(0);
    let introvert = report.class_metrics(1);

    let body = format!(
        r#"<h1>📊 Penjelasan Model Machine Learning</h1>
<p>Aplikasi ini dibangun di atas model klasifikasi untuk membedakan antara dua tipe kepribadian utama: <strong>Introvert</strong> dan <strong>Ekstrovert</strong>.</p>

<h2>Algoritma: Random Forest Classifier</h2>
<p>Model yang digunakan adalah <strong>Random Forest Classifier</strong>. Algoritma ini dipilih karena beberapa keunggulan:</p>
<ul>
<li><strong>Kuat dan Akurat</strong>: Mampu menangani data kompleks dan menghasilkan akurasi yang tinggi.</li>
<li><strong>Mengurangi Overfitting</strong>: Dengan membangun banyak <em>decision tree</em> dan mengambil rata-rata hasilnya, model ini lebih tahan terhadap <em>overfitting</em> dibandingkan satu <em>decision tree</em>.</li>
<li><strong>Memberikan Bobot Fitur</strong>: Dapat memberikan gambaran tentang fitur mana yang paling berpengaruh dalam prediksi.</li>
</ul>
<p>Model ini dilatih menggunakan <code>GridSearchCV</code> untuk menemukan kombinasi parameter terbaik, yang menghasilkan akurasi <strong>~{accuracy:.1}%</strong> pada data uji.</p>

<h2>Sumber Dataset</h2>
<p>Dataset yang digunakan dalam proyek ini bersumber dari file <code>personality_datasert.csv</code>. Dataset ini memiliki 8 kolom, dengan fitur-fitur sebagai berikut:</p>
<ul>
{features}<li><code>Personality</code> (Target)</li>
</ul>
<p>Berikut adalah 5 baris pertama dari dataset:</p>
{dataset}
<h2>Evaluasi Model</h2>
<p>Berikut adalah metrik evaluasi dari model terbaik:</p>
<pre><code>{report_text}</code></pre>
<ul>
<li><strong>Akurasi</strong>: Secara keseluruhan, model benar dalam {accuracy:.1}% kasus.</li>
<li><strong>Precision (Extrovert)</strong>: Ketika model memprediksi 'Extrovert', {extrovert_precision:.0}% di antaranya benar.</li>
<li><strong>Recall (Introvert)</strong>: Model berhasil mengidentifikasi {introvert_recall:.0}% dari semua 'Introvert' yang sebenarnya.</li>
</ul>
<div class="alert info">Secara umum, metrik ini menunjukkan bahwa model memiliki performa yang sangat baik dan seimbang dalam memprediksi kedua kelas kepribadian.</div>
"#,
        accuracy = report.accuracy() * 100.0,
        features = features,
        dataset = dataset_section(preview),
        report_text = escape(&report.render_text()),
        extrovert_precision = extrovert.precision * 100.0,
        introvert_recall = introvert.recall * 100.0,
    );

    layout("Penjelasan Model", "📊", true, &body)
}

/// Minimal page for failed requests.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{status}</h1>
<div class="alert error" role="alert">{message}</div>
<p><a href="/">Kembali ke formulir</a></p>
"#,
        status = status,
        message = escape(message),
    );
    layout("Personality Predictor", "🧠", false, &body)
}
