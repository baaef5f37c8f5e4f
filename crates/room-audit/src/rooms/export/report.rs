use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::rooms::domain::{Photo, Review, Room};
use crate::rooms::offices::{floor_display, OfficeDirectory};

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Self-contained HTML document for printing or print-to-PDF. PDF encoding
/// itself is left to the platform print function.
pub fn printable_report(
    room: &Room,
    offices: &OfficeDirectory,
    reviews: &[&Review],
    generated_at: DateTime<Utc>,
) -> String {
    let office_name = offices
        .get(&room.office)
        .map(|office| office.name)
        .unwrap_or(room.office.as_str());

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    let _ = writeln!(
        html,
        "<title>Review history - Room {}</title>",
        escape_html(&room.number)
    );
    html.push_str(REPORT_STYLE);
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(
        html,
        "<h1>Review history - Room {}</h1>",
        escape_html(&room.number)
    );
    let _ = writeln!(
        html,
        "<div class=\"info\"><strong>Floor:</strong> {} | <strong>Office:</strong> {} | <strong>Reviews:</strong> {}</div>",
        escape_html(&floor_display(&room.floor)),
        escape_html(office_name),
        reviews.len()
    );

    for (index, review) in reviews.iter().enumerate() {
        let _ = writeln!(html, "<div class=\"review\">");
        let _ = writeln!(
            html,
            "<div class=\"review-header\">{}. Reviewed {}</div>",
            index + 1,
            review.recorded_at.format(TIMESTAMP_FORMAT)
        );

        html.push_str("<div class=\"equipment\">\n");
        for (item, present) in review.equipment.entries() {
            let class = if present { "tag present" } else { "tag absent" };
            let _ = writeln!(html, "<span class=\"{}\">{}</span>", class, item.label());
        }
        html.push_str("</div>\n");

        if !review.note.is_empty() {
            let _ = writeln!(
                html,
                "<div class=\"note\"><strong>Note:</strong><br>{}</div>",
                escape_html(&review.note)
            );
        }

        if let Some(photo) = &review.photo {
            let _ = writeln!(
                html,
                "<div><img class=\"photo\" src=\"{}\" alt=\"Room photo\" /></div>",
                photo_src(photo)
            );
        }

        html.push_str("</div>\n");
    }

    let _ = writeln!(
        html,
        "<div class=\"footer\">Generated {} UTC</div>",
        generated_at.format(TIMESTAMP_FORMAT)
    );
    html.push_str("</body>\n</html>\n");
    html
}

const REPORT_STYLE: &str = "<style>\n\
    body { font-family: Arial, sans-serif; padding: 20px; }\n\
    h1 { color: #333; border-bottom: 3px solid #FFD700; padding-bottom: 10px; }\n\
    .info { margin-bottom: 20px; font-size: 14px; color: #666; }\n\
    .review { border: 1px solid #ddd; padding: 15px; margin-bottom: 15px; page-break-inside: avoid; }\n\
    .review-header { font-weight: bold; margin-bottom: 10px; color: #333; }\n\
    .equipment { display: flex; flex-wrap: wrap; gap: 8px; margin: 10px 0; }\n\
    .tag { padding: 4px 12px; border-radius: 12px; font-size: 12px; }\n\
    .tag.present { background: #d4edda; color: #155724; }\n\
    .tag.absent { background: #f8d7da; color: #721c24; }\n\
    .note { background: #f8f9fa; padding: 10px; border-radius: 6px; margin-top: 10px; font-size: 13px; }\n\
    .photo { max-width: 300px; margin-top: 10px; }\n\
    .footer { margin-top: 30px; border-top: 1px solid #ddd; padding-top: 10px; font-size: 12px; color: #666; }\n\
    @media print { body { padding: 0; } }\n\
</style>\n";

fn photo_src(photo: &Photo) -> String {
    match photo {
        Photo::Embedded { media_type, bytes } => {
            format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
        }
        Photo::Stored { path } => escape_html(path),
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }
}
