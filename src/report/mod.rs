//! Text rendering of a [`SummaryResult`] for the console and report files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::bilibili::{SummaryResult, VideoId};

const FILE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");
const HUMAN_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const UNTITLED: &str = "(untitled)";

/// Renders the summary, outline and subtitles. With `time_detail` every
/// section and line carries its timestamp.
pub fn render_text(result: &SummaryResult, time_detail: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary: {}", result.summary);

    let _ = writeln!(out, "\n=== Video Outline ===");
    for section in &result.outline {
        if time_detail {
            let _ = writeln!(
                out,
                "Title: {} (timestamp: {}s)",
                section.title, section.timestamp_seconds
            );
        } else {
            let _ = writeln!(out, "Title: {}", section.title);
        }
        for part in &section.parts {
            if time_detail {
                let _ = writeln!(
                    out,
                    "  - {} (timestamp: {}s)",
                    part.content, part.timestamp_seconds
                );
            } else {
                let _ = writeln!(out, "  - {}", part.content);
            }
        }
    }

    let _ = writeln!(out, "\n=== AI Subtitles ===");
    for section in &result.subtitle {
        let title = if section.title.is_empty() {
            UNTITLED
        } else {
            section.title.as_str()
        };
        if time_detail {
            let _ = writeln!(
                out,
                "Title: {} (timestamp: {}s)",
                title, section.timestamp_seconds
            );
        } else {
            let _ = writeln!(out, "Title: {}", title);
        }
        for part in &section.parts {
            if time_detail {
                let _ = writeln!(
                    out,
                    "  - {} ({}s - {}s)",
                    part.content, part.start_seconds, part.end_seconds
                );
            } else {
                let _ = writeln!(out, "  - {}", part.content);
            }
        }
    }

    out
}

/// File contents: a short header followed by [`render_text`].
pub fn render_file(
    result: &SummaryResult,
    video_id: &VideoId,
    time_detail: bool,
    generated_at: OffsetDateTime,
) -> String {
    let generated = generated_at
        .format(HUMAN_STAMP)
        .unwrap_or_else(|_| generated_at.unix_timestamp().to_string());

    let mut out = String::new();
    let _ = writeln!(out, "Bilibili AI summary - {}", video_id);
    let _ = writeln!(out, "Generated at: {}", generated);
    let _ = writeln!(out, "{}", "=".repeat(50));
    out.push_str(&render_text(result, time_detail));
    out
}

/// `<video_id>_<yyyyMMdd_HHmmss>.txt`
pub fn file_name(video_id: &VideoId, generated_at: OffsetDateTime) -> String {
    let stamp = generated_at
        .format(FILE_STAMP)
        .unwrap_or_else(|_| generated_at.unix_timestamp().to_string());
    format!("{}_{}.txt", video_id, stamp)
}

/// Writes the report into `dir` and returns the path written.
pub async fn write_report(
    dir: &Path,
    video_id: &VideoId,
    result: &SummaryResult,
    time_detail: bool,
) -> std::io::Result<PathBuf> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let path = dir.join(file_name(video_id, now));

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, render_file(result, video_id, time_detail, now)).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bilibili::{OutlinePart, OutlineSection, SubtitlePart, SubtitleSection};
    use time::macros::datetime;

    fn sample() -> SummaryResult {
        SummaryResult {
            summary: "Short overview".into(),
            outline: vec![OutlineSection {
                title: "Opening".into(),
                timestamp_seconds: 4,
                parts: vec![OutlinePart {
                    content: "Why signing matters".into(),
                    timestamp_seconds: 5,
                }],
            }],
            subtitle: vec![SubtitleSection {
                title: String::new(),
                timestamp_seconds: 0,
                parts: vec![SubtitlePart {
                    content: "hello".into(),
                    start_seconds: 1,
                    end_seconds: 2,
                }],
            }],
        }
    }

    #[test]
    fn test_render_text_plain() {
        let text = render_text(&sample(), false);
        assert_eq!(
            text,
            "Summary: Short overview\n\
             \n=== Video Outline ===\n\
             Title: Opening\n\
             \x20 - Why signing matters\n\
             \n=== AI Subtitles ===\n\
             Title: (untitled)\n\
             \x20 - hello\n"
        );
    }

    #[test]
    fn test_render_text_with_time_detail() {
        let text = render_text(&sample(), true);
        assert!(text.contains("Title: Opening (timestamp: 4s)"));
        assert!(text.contains("  - Why signing matters (timestamp: 5s)"));
        assert!(text.contains("Title: (untitled) (timestamp: 0s)"));
        assert!(text.contains("  - hello (1s - 2s)"));
    }

    #[test]
    fn test_file_name_and_header() {
        let at = datetime!(2024-03-09 07:05:01 UTC);
        let video = VideoId::from("BV1xx411c7mD");
        assert_eq!(file_name(&video, at), "BV1xx411c7mD_20240309_070501.txt");

        let contents = render_file(&sample(), &video, false, at);
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Bilibili AI summary - BV1xx411c7mD"));
        assert_eq!(lines.next(), Some("Generated at: 2024-03-09 07:05:01"));
        assert_eq!(lines.next().map(str::len), Some(50));
        assert_eq!(lines.next(), Some("Summary: Short overview"));
    }
}
