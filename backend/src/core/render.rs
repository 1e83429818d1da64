//! Presentation: turns list state into HTML pages and terminal lines.
//! Everything here is a pure function of its arguments.

use crate::core::models::{ListState, Photo};
use crate::core::navigation::Route;

const STYLE: &str = "font-family:system-ui;background:#0f1117;color:#e5e7eb;margin:2rem";

// ── HTML ─────────────────────────────────────────────────────

pub fn main_page(
    available: &ListState<Photo>,
    saved: &ListState<Photo>,
    notice: Option<&str>,
) -> String {
    let banner = notice
        .map(|n| {
            format!(
                r#"<p class="notice" style="background:#7f1d1d;padding:.5rem">Could not update local storage: {}</p>"#,
                escape(n)
            )
        })
        .unwrap_or_default();

    let body = format!(
        "{banner}<h1>Home screen</h1>\
         <h2>Images from jsonplaceholder.typicode.com</h2>{}\
         <h2>Saved Images</h2>{}",
        photo_list(available, "No available images.", PhotoAction::Save),
        photo_list(saved, "No saved images available.", PhotoAction::Delete),
    );
    page("Photos", &body)
}

pub fn detail_page(photo: Option<&Photo>) -> String {
    let body = match photo {
        Some(p) => format!(
            r#"<p><a href="{back}">&lt; Photos</a></p>
<img src="{url}" alt="Selected Image" style="max-width:100%;height:300px;object-fit:cover">
<h2>Selected Image</h2>
<p>Id: {id}</p>
<p>Title: {title}</p>
<p>Album number: {album}</p>
<p>Album title: {album_title}</p>"#,
            back = Route::List.path(),
            url = escape(&p.image_url),
            id = p.id,
            title = escape(&p.title),
            album = p.album_id,
            album_title = escape(p.album_title.as_deref().unwrap_or("unknown")),
        ),
        None => "<p>Error: Image not found</p>".to_string(),
    };
    page("Photo detail", &body)
}

pub fn invalid_id_page() -> String {
    page("Photo detail", "<p>Error: Invalid image ID</p>")
}

#[derive(Clone, Copy)]
enum PhotoAction {
    Save,
    Delete,
}

fn photo_list(state: &ListState<Photo>, empty: &str, action: PhotoAction) -> String {
    match state {
        ListState::Loading => "<p>Loading…</p>".to_string(),
        ListState::Failed { error } => format!("<p>Error: {}</p>", escape(error)),
        ListState::Loaded { items } if items.is_empty() => format!("<p>{empty}</p>"),
        ListState::Loaded { items } => {
            let rows: String = items.iter().map(|p| photo_row(p, action)).collect();
            format!("<ul>{rows}</ul>")
        }
    }
}

fn photo_row(photo: &Photo, action: PhotoAction) -> String {
    let (target, label) = match action {
        PhotoAction::Save => (format!("/saved/{}", photo.id), "Save"),
        PhotoAction::Delete => (format!("/saved/{}/delete", photo.id), "Delete"),
    };
    format!(
        r#"<li><img src="{thumb}" alt="Thumbnail of image" width="70" height="70"> <a href="{detail}">{title}</a> <form method="post" action="{target}" style="display:inline"><button>{label}</button></form></li>"#,
        thumb = escape(&photo.thumbnail_url),
        detail = Route::Detail(photo.id).path(),
        title = escape(&photo.title),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>{title}</title></head>
<body style="{STYLE}">
{body}
</body></html>"#
    )
}

fn escape(text: &str) -> String {
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

// ── Terminal ─────────────────────────────────────────────────

pub fn list_lines(state: &ListState<Photo>, empty: &str) -> Vec<String> {
    match state {
        ListState::Loading => vec!["  Loading...".to_string()],
        ListState::Failed { error } => vec![format!("  Error: {error}")],
        ListState::Loaded { items } if items.is_empty() => vec![format!("  {empty}")],
        ListState::Loaded { items } => items
            .iter()
            .enumerate()
            .map(|(i, p)| format!("  {}. {} (#{})", i + 1, p.title, p.id))
            .collect(),
    }
}

pub fn detail_lines(photo: Option<&Photo>) -> Vec<String> {
    let Some(p) = photo else {
        return vec!["Error: Image not found".to_string()];
    };
    vec![
        format!("--- {} ---", p.title),
        format!("  Id:     {}", p.id),
        format!("  Album:  {}", p.album_id),
        format!(
            "  Album title: {}",
            p.album_title.as_deref().unwrap_or("unknown")
        ),
        format!("  Image:  {}", p.image_url),
        format!("  Thumb:  {}", p.thumbnail_url),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::sample_photo;

    #[test]
    fn test_main_page_renders_each_state() {
        let html = main_page(
            &ListState::loaded(vec![sample_photo(1)]),
            &ListState::Loading,
            None,
        );
        assert!(html.contains(r#"action="/saved/1""#));
        assert!(html.contains(r#"href="/photos/1""#));
        assert!(html.contains("Loading"));

        let html = main_page(&ListState::failed("timed out"), &ListState::loaded(vec![]), None);
        assert!(html.contains("Error: timed out"));
        assert!(html.contains("No saved images available."));
    }

    #[test]
    fn test_saved_rows_get_delete_action_and_notice_banner() {
        let html = main_page(
            &ListState::loaded(vec![]),
            &ListState::loaded(vec![sample_photo(4)]),
            Some("disk full"),
        );
        assert!(html.contains(r#"action="/saved/4/delete""#));
        assert!(html.contains("No available images."));
        assert!(html.contains("Could not update local storage: disk full"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let mut photo = sample_photo(2);
        photo.title = "<script>alert('x')</script>".into();
        let html = detail_page(Some(&photo));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_detail_placeholders() {
        assert!(detail_page(None).contains("Error: Image not found"));
        assert!(invalid_id_page().contains("Error: Invalid image ID"));
        assert!(detail_page(Some(&sample_photo(3))).contains("Album title: unknown"));
    }

    #[test]
    fn test_terminal_lines() {
        let lines = list_lines(&ListState::loaded(vec![sample_photo(5), sample_photo(6)]), "none");
        assert_eq!(lines, vec!["  1. photo 5 (#5)", "  2. photo 6 (#6)"]);
        assert_eq!(list_lines(&ListState::loaded(vec![]), "none"), vec!["  none"]);
        assert_eq!(detail_lines(None), vec!["Error: Image not found"]);
    }
}
