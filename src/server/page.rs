// HTML pages for the browser form

use std::fmt::Write;

use crate::data::{Field, StudentRecord};
use crate::predictor::{Prediction, MAX_SCORE};

const STYLE: &str = "body{font-family:sans-serif;max-width:640px;margin:2em auto;color:#222}\
label{display:block;margin-top:1em;font-weight:bold}\
select{width:100%;padding:.3em}\
button{margin-top:1.5em;padding:.5em 1.5em}\
.score{font-size:3em;text-align:center;color:#1f77b4}\
.bar{background:#eee;height:12px}.bar div{background:#1f77b4;height:12px}\
table{border-collapse:collapse;margin-top:1em}td{padding:.2em .8em}";

fn html_form_name(field: Field) -> &'static str {
    match field {
        Field::Gender => "gender",
        Field::RaceEthnicity => "race_ethnicity",
        Field::ParentalEducation => "parental_education",
        Field::Lunch => "lunch",
        Field::TestPreparation => "test_preparation",
    }
}

pub fn escape_html(text: &str) -> String {
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

fn wrap(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>{}</style></head><body>{}</body></html>",
        escape_html(title),
        STYLE,
        body
    )
}

/// Input form with one select per categorical field
pub fn render_form() -> String {
    let mut body = String::from(
        "<h1>Student Math Score Prediction</h1>\
         <p>Predicts a math score (0-100) from five social and demographic factors \
         using a linear regression model.</p>\
         <form method=\"post\" action=\"/predict\">",
    );

    for field in Field::ALL {
        let name = html_form_name(field);
        let _ = write!(
            body,
            "<label for=\"{name}\">{}</label><select id=\"{name}\" name=\"{name}\">",
            escape_html(field.label())
        );
        for value in field.legal_values() {
            let value = escape_html(value);
            let _ = write!(body, "<option value=\"{value}\">{value}</option>");
        }
        body.push_str("</select>");
    }

    body.push_str("<button type=\"submit\">Predict math score</button></form>");
    wrap("Math Score Prediction", &body)
}

/// Result page for one prediction
pub fn render_result(record: &StudentRecord, prediction: &Prediction) -> String {
    let mut body = String::from("<h1>Prediction</h1>");

    let _ = write!(
        body,
        "<div class=\"score\">{:.1}</div>\
         <div class=\"bar\"><div style=\"width:{:.0}%\"></div></div>\
         <p><b>Category:</b> {}</p>",
        prediction.score,
        prediction.score / MAX_SCORE * 100.0,
        prediction.band.label()
    );

    body.push_str("<h2>Input</h2><table>");
    for field in Field::ALL {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(field.label()),
            escape_html(record.value(field))
        );
    }
    body.push_str("</table>");

    body.push_str("<h2>How the score was built</h2><table>");
    let _ = write!(
        body,
        "<tr><td>Baseline (reference levels)</td><td>{:.2}</td></tr>",
        prediction.baseline
    );
    for c in &prediction.contributions {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{:+.2}</td></tr>",
            escape_html(&c.feature),
            c.points
        );
    }
    body.push_str("</table>");

    if !prediction.unrecognized.is_empty() {
        let fields: Vec<&str> = prediction.unrecognized.iter().map(|f| f.label()).collect();
        let _ = write!(
            body,
            "<p><i>Unrecognized values for {}: not seen in training, scored at the baseline.</i></p>",
            escape_html(&fields.join(", "))
        );
    }

    body.push_str(
        "<p><small>Estimate from a linear regression model, not a definitive assessment.</small></p>\
         <p><a href=\"/\">Predict again</a></p>",
    );
    wrap("Math Score Prediction", &body)
}
