//! Booth page rendering.

use smilebooth_models::{ClassifierHealth, GalleryEntry};

const BOOTH_SCRIPT: &str = include_str!("../assets/booth.js");

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 1rem; background: #fafafa; color: #222; }
h1 { text-align: center; }
.booth { display: flex; flex-direction: column; align-items: center; gap: 0.75rem; }
video { width: 640px; max-width: 100%; border-radius: 8px; background: #000; }
canvas { display: none; }
.controls button { font-size: 1rem; padding: 0.5rem 1.25rem; margin: 0 0.25rem; }
#smileStatus { min-height: 1.5rem; font-weight: bold; }
#smileStatus.smiling { color: #1a7f37; }
#smileStatus.captured { color: #0969da; }
#smileStatus.error { color: #cf222e; }
.warning { background: #fff8c5; border: 1px solid #d4a72c; padding: 0.75rem; border-radius: 6px; }
.gallery-container { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 0.75rem; }
.gallery-item img { width: 100%; border-radius: 6px; }
"#;

/// Render the booth page for the given gallery and classifier state.
pub fn render_index(entries: &[GalleryEntry], health: ClassifierHealth) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Smile Booth</title>
<style>{style}</style>
</head>
<body>
<h1>Smile Booth</h1>
{warning}<section class="booth">
<video id="video" autoplay playsinline muted></video>
<canvas id="canvas"></canvas>
<div class="controls">
<button id="startCamera" type="button">Start Camera</button>
<button id="takeSelfie" type="button" disabled>Take Selfie</button>
</div>
<p id="smileStatus">Press "Start Camera" to begin.</p>
</section>
<h2>Gallery</h2>
<section class="gallery-container">
{gallery}</section>
<script>{script}</script>
</body>
</html>
"#,
        style = STYLE,
        warning = render_warning(health),
        gallery = render_gallery(entries),
        script = BOOTH_SCRIPT,
    )
}

fn render_warning(health: ClassifierHealth) -> String {
    if health.is_ready() {
        return String::new();
    }
    let missing: Vec<&str> = health.missing().iter().map(|kind| kind.as_str()).collect();
    format!(
        "<div class=\"warning\">Smile detection is unavailable: the {} classifier could not be loaded. \
         Check the server log for details.</div>\n",
        escape_html(&missing.join(" and "))
    )
}

fn render_gallery(entries: &[GalleryEntry]) -> String {
    if entries.is_empty() {
        return "<p>No selfies yet. Smile to take one!</p>\n".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "<div class=\"gallery-item\"><img src=\"/static/{}\" alt=\"{}\" loading=\"lazy\"></div>\n",
                escape_html(&entry.path),
                escape_html(&entry.filename)
            )
        })
        .collect()
}

/// Escape text for use in HTML content and quoted attributes.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn entry(name: &str) -> GalleryEntry {
        GalleryEntry {
            filename: name.to_string(),
            path: format!("images/{}", name),
            created_at: Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_gallery_message() {
        let html = render_index(&[], ClassifierHealth::new(true, true));
        assert!(html.contains("No selfies yet"));
        assert!(!html.contains("gallery-item\">"));
        assert!(!html.contains("class=\"warning\""));
    }

    #[test]
    fn test_gallery_preserves_order() {
        let entries = vec![entry("smile_20240501_120002.jpg"), entry("smile_20240501_120001.jpg")];
        let html = render_index(&entries, ClassifierHealth::new(true, true));
        let newer = html.find("/static/images/smile_20240501_120002.jpg").unwrap();
        let older = html.find("/static/images/smile_20240501_120001.jpg").unwrap();
        assert!(newer < older);
        assert!(!html.contains("No selfies yet"));
    }

    #[test]
    fn test_warning_names_missing_classifier() {
        let html = render_index(&[], ClassifierHealth::new(true, false));
        assert!(html.contains("class=\"warning\""));
        assert!(html.contains("the smile classifier"));
    }

    #[test]
    fn test_page_embeds_controls_and_script() {
        let html = render_index(&[], ClassifierHealth::new(true, true));
        for id in ["id=\"video\"", "id=\"canvas\"", "id=\"startCamera\"", "id=\"takeSelfie\"", "id=\"smileStatus\""] {
            assert!(html.contains(id), "missing {}", id);
        }
        assert!(html.contains("setInterval(detectOnce"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
