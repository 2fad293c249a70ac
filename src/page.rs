//! Server-rendered HTML for the single page of the app.

use std::fmt::Write;

use crate::models::Label;
use crate::session::SessionState;

const STYLE: &str = r#"
body {
    margin: 0;
    min-height: 100vh;
    font-family: "Source Sans Pro", Helvetica, Arial, sans-serif;
    background: linear-gradient(135deg, #e3f2fd, #f1f8e9);
}
.main {
    max-width: 760px;
    margin: 40px auto;
    background-color: white;
    padding: 35px;
    border-radius: 20px;
    box-shadow: 0px 10px 30px rgba(0,0,0,0.08);
}
.title-text {
    font-size: 42px;
    font-weight: 800;
    text-align: center;
    color: #0d47a1;
}
.subtitle-text {
    text-align: center;
    font-size: 16px;
    color: #546e7a;
}
.info, .warning, .error, .success {
    padding: 14px 18px;
    border-radius: 10px;
    margin: 18px 0;
}
.info { background: #e3f2fd; color: #0d47a1; }
.warning { background: #fff8e1; color: #8d6e00; }
.error { background: #ffebee; color: #b71c1c; }
.success { background: #e8f5e9; color: #1b5e20; }
.card {
    background: linear-gradient(135deg, #e3f2fd, #ffffff);
    padding: 22px;
    border-radius: 16px;
    border-left: 8px solid #1976d2;
    margin-top: 25px;
}
.solution {
    background: linear-gradient(135deg, #e8f5e9, #ffffff);
    padding: 22px;
    border-radius: 16px;
    border-left: 8px solid #2e7d32;
    margin-top: 25px;
}
.preview { width: 100%; border-radius: 12px; }
.actions { display: flex; gap: 16px; margin-top: 20px; }
button, .button {
    background: linear-gradient(90deg, #1976d2, #42a5f5);
    color: white;
    border: none;
    border-radius: 30px;
    padding: 10px 25px;
    font-size: 16px;
    font-weight: 600;
    text-decoration: none;
    cursor: pointer;
}
progress { width: 100%; height: 14px; }
#spinner { display: none; color: #546e7a; }
.footer {
    text-align: center;
    font-size: 13px;
    color: #607d8b;
    margin-top: 30px;
}
"#;

const PNEUMONIA_GUIDANCE: &[&str] = &[
    "Consult a medical professional",
    "Complete prescribed medication",
    "Proper rest &amp; hydration",
    "Avoid smoking",
];

const NORMAL_GUIDANCE: &[&str] = &[
    "Maintain good respiratory hygiene",
    "Balanced diet &amp; exercise",
];

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the full page for one session.
pub fn render(state: &SessionState) -> String {
    let mut body = String::new();

    body.push_str("<div class='title-text'>&#x1FAC1; Pneumonia Detection System</div>\n");
    body.push_str(
        "<div class='subtitle-text'>AI-powered Chest X-ray Analysis &amp; Health Guidance</div>\n<hr>\n",
    );
    body.push_str(
        "<div class='info'>&#x1F4CC; Upload a chest X-ray image to analyze lung condition.<br><br>\
         &#x26A0;&#xFE0F; This system is for educational purposes only.</div>\n",
    );

    body.push_str(
        "<form action='/upload' method='post' enctype='multipart/form-data'>\n\
         <label>&#x1F4E4; Upload Chest X-ray Image</label><br>\n\
         <input type='file' name='file' accept='.jpg,.jpeg,.png' required>\n\
         <button type='submit'>Upload</button>\n\
         </form>\n",
    );

    if let Some(notice) = state.notice() {
        let _ = writeln!(body, "<div class='error'>{}</div>", notice.message());
    }

    if let Some(staged) = state.staged() {
        let _ = write!(
            body,
            "<h3>&#x1F5BC; Uploaded X-ray Image</h3>\n\
             <img class='preview' src='/image' alt='{}'>\n\
             <form action='/analyze' method='post' \
             onsubmit=\"document.getElementById('spinner').style.display='block'\">\n\
             <button type='submit'>&#x1F50D; Analyze X-ray</button>\n\
             </form>\n\
             <p id='spinner'>Analyzing X-ray using AI model...</p>\n",
            escape(&staged.file_name),
        );
    }

    if let Some(result) = state.result() {
        body.push_str("<div class='card'>\n<h3>&#x1F4CA; Analysis Result</h3>\n");
        match result.label() {
            Label::Pneumonia => {
                body.push_str("<div class='error'>&#x26A0;&#xFE0F; Pneumonia Detected</div>\n");
                let _ = writeln!(body, "<p><b>Risk Level:</b> {}</p>", result.risk());
            }
            Label::Normal => {
                body.push_str("<div class='success'>&#x2705; Normal (No Pneumonia Detected)</div>\n");
            }
        }
        let _ = write!(
            body,
            "<progress value='{conf:.2}' max='100'></progress>\n\
             <p><b>Confidence Score:</b> <code>{conf:.2}%</code></p>\n</div>\n",
            conf = result.confidence(),
        );

        body.push_str(
            "<div class='actions'>\n\
             <form action='/guidance' method='post'>\
             <button type='submit'>&#x1F4A1; View Suggested Care &amp; Guidance</button></form>\n\
             <a class='button' href='/report'>&#x2B07;&#xFE0F; Download Medical Report</a>\n\
             </div>\n",
        );

        if state.guidance_visible() {
            body.push_str("<div class='solution'>\n<h3>&#x1FA7A; Suggested Care &amp; Guidance</h3>\n<ul>\n");
            let items = match result.label() {
                Label::Pneumonia => PNEUMONIA_GUIDANCE,
                Label::Normal => NORMAL_GUIDANCE,
            };
            for item in items {
                let _ = writeln!(body, "<li>{item}</li>");
            }
            body.push_str(
                "</ul>\n<div class='warning'>&#x26A0;&#xFE0F; This is not a medical diagnosis.</div>\n</div>\n",
            );
        }
    }

    body.push_str(
        "<hr>\n<div class='footer'>Final Year B.Tech Project | Artificial Intelligence &amp; Data Science</div>\n",
    );

    format!(
        "<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'>\n\
         <title>Pneumonia Detection System</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<div class='main'>\n{body}</div>\n</body>\n</html>\n"
    )
}
