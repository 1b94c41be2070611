//! HTML rendering of a paginated calendar.

use calsheet_core::{CalendarDocument, DisplayEvent, Icon, Page};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: "Helvetica Neue", Helvetica, Arial, sans-serif; color: #111; }
.page { padding: 0.6in; page-break-after: always; }
.page:last-child { page-break-after: auto; }
.page-header h1 { margin: 0 0 0.3in; font-size: 2.4em; font-weight: 300; letter-spacing: 0.05em; text-transform: uppercase; }
.events { list-style: none; margin: 0; padding: 0; }
.event { display: flex; align-items: stretch; border-top: 1px solid #ddd; padding: 0.15in 0; }
.date { width: 0.9in; text-align: center; }
.dow { display: block; font-size: 0.9em; text-transform: uppercase; color: #666; }
.day { display: block; font-size: 2.2em; font-weight: 700; }
.icon { width: 0.9in; display: flex; align-items: center; justify-content: center; }
.icon svg, .icon img { width: 0.7in; height: 0.7in; }
.details { flex: 1; line-height: 1.1; }
.event-type { font-size: 0.8em; font-weight: 700; text-transform: uppercase; letter-spacing: 0.08em; }
.title { font-weight: 700; }
.time { font-size: 0.9em; color: #444; }
"#;

/// Stylesheet rules that depend on the document.
fn document_css(document: &CalendarDocument) -> String {
    format!(".subtitle {{ font-size: {}em; }}", document.min_title_size)
}

/// Render the whole document, one `section.page` per page.
pub fn render_document(document: &CalendarDocument) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (document.title) }
                style { (PreEscaped(CSS)) (PreEscaped(document_css(document))) }
            }
            body {
                @for page in &document.pages {
                    (render_page(&document.title, page))
                }
            }
        }
    }
}

fn render_page(title: &str, page: &Page) -> Markup {
    html! {
        section.page data-page=(page.number) {
            header.page-header {
                h1 { (title) }
            }
            ol.events {
                @for event in page.events {
                    (render_event(event))
                }
            }
        }
    }
}

fn render_event(event: &DisplayEvent) -> Markup {
    html! {
        li.event {
            div.date {
                span.dow { (event.dow) }
                span.day { (event.day) }
            }
            div.icon {
                @match &event.icon {
                    Some(Icon::Svg(svg)) => { (PreEscaped(svg)) }
                    Some(Icon::Image(path)) => { img src=(path.to_string_lossy()) alt=""; }
                    None => {}
                }
            }
            div.details {
                div.event-type style={"color: " (event.color)} { (event.event_type) }
                div.title style={"font-size: " (event.title_size) "em"} { (event.name) }
                @if let Some(subtitle) = &event.subtitle {
                    div.subtitle { (subtitle) }
                }
                div.spacer style={"height: " (event.spacer_size) "em"} {}
                div.time { (event.time_range) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calsheet_core::paginate;
    use calsheet_core::Settings;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn make_event(day: u32, name: &str) -> DisplayEvent {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        DisplayEvent {
            date,
            dow: date.format("%a").to_string(),
            day: day.to_string(),
            event_type: "Meeting".to_string(),
            name: name.to_string(),
            subtitle: None,
            icon: None,
            start_time: "9:00AM".to_string(),
            end_time: Some("11:00AM".to_string()),
            time_range: "9:00AM-11:00AM".to_string(),
            color: "#123456".to_string(),
            title_size: 4.5,
            spacer_size: 0.5,
        }
    }

    fn render(events: &[DisplayEvent], page_size: usize) -> String {
        let pages = paginate(events, page_size, None).unwrap();
        let document = CalendarDocument::new(pages, &Settings::default()).unwrap();
        render_document(&document).into_string()
    }

    #[test]
    fn one_section_per_page() {
        let events: Vec<_> = (1..=5).map(|d| make_event(d, "Standup")).collect();
        let html = render(&events, 2);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("class=\"page\"").count(), 3);
        assert_eq!(html.matches("<li class=\"event\"").count(), 5);
        assert_eq!(html.matches("<h1>March 2024</h1>").count(), 3);
        assert!(html.contains("page-break-after: always"));
    }

    #[test]
    fn event_fields_are_rendered() {
        let html = render(&[make_event(5, "Design Review")], 8);

        assert!(html.contains("<span class=\"dow\">Tue</span>"), "{}", html);
        assert!(html.contains("<span class=\"day\">5</span>"), "{}", html);
        assert!(html.contains("style=\"color: #123456\""), "{}", html);
        assert!(html.contains("style=\"font-size: 4.5em\""), "{}", html);
        assert!(html.contains("style=\"height: 0.5em\""), "{}", html);
        assert!(html.contains("9:00AM-11:00AM"), "{}", html);
        assert!(!html.contains("class=\"subtitle\""), "{}", html);
    }

    #[test]
    fn subtitle_uses_minimum_title_size() {
        let mut event = make_event(5, "Launch");
        event.subtitle = Some("Rooftop".to_string());
        let html = render(&[event], 8);

        assert!(html.contains("<div class=\"subtitle\">Rooftop</div>"), "{}", html);
        assert!(html.contains(".subtitle { font-size: 2.6em; }"), "{}", html);
    }

    #[test]
    fn text_is_escaped_but_svg_is_inlined() {
        let mut event = make_event(5, "<b>Q&A</b>");
        event.icon = Some(Icon::Svg("<svg><path d=\"M0 0\"/></svg>".to_string()));
        let html = render(&[event], 8);

        assert!(html.contains("&lt;b&gt;Q&amp;A&lt;/b&gt;"), "{}", html);
        assert!(html.contains("<svg><path d=\"M0 0\"/></svg>"), "{}", html);
    }

    #[test]
    fn raster_icon_is_an_img() {
        let mut event = make_event(5, "Pairing");
        event.icon = Some(Icon::Image(PathBuf::from("icons/pair.png")));
        let html = render(&[event], 8);

        assert!(html.contains("<img src=\"icons/pair.png\" alt=\"\">"), "{}", html);
    }
}
