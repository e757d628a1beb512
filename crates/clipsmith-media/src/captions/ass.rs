//! ASS subtitle rendering for caption burn-in.
//!
//! One dialogue event per word, so exactly one word is on screen at a
//! time. Hook words use a separate style the encoder's subtitle filter
//! picks up for highlight coloring.

use std::path::Path;

use clipsmith_models::{CaptionTrack, WordEvent};

use crate::error::MediaResult;

/// Style name for regular words.
const STYLE_WORD: &str = "Word";
/// Style name for hook words.
const STYLE_HOOK: &str = "Hook";

/// Render a caption track as an ASS document sized to the output frame.
pub fn render_track(track: &CaptionTrack, play_width: u32, play_height: u32) -> String {
    let mut doc = String::with_capacity(512 + track.len() * 64);

    doc.push_str("[Script Info]\n");
    doc.push_str("ScriptType: v4.00+\n");
    doc.push_str(&format!("PlayResX: {}\n", play_width));
    doc.push_str(&format!("PlayResY: {}\n", play_height));
    doc.push_str("WrapStyle: 2\n\n");

    doc.push_str("[V4+ Styles]\n");
    doc.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, OutlineColour, BackColour, \
         Bold, Outline, Shadow, Alignment, MarginL, MarginR, MarginV\n",
    );
    let font_size = play_height / 18;
    doc.push_str(&format!(
        "Style: {},Arial,{},&H00FFFFFF,&H00000000,&H7F000000,1,4,1,2,40,40,{}\n",
        STYLE_WORD,
        font_size,
        play_height / 5
    ));
    doc.push_str(&format!(
        "Style: {},Arial,{},&H0000D7FF,&H00000000,&H7F000000,1,4,1,2,40,40,{}\n\n",
        STYLE_HOOK,
        font_size,
        play_height / 5
    ));

    doc.push_str("[Events]\n");
    doc.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for event in &track.events {
        doc.push_str(&dialogue_line(event));
        doc.push('\n');
    }

    doc
}

/// Render and write the track next to the encode scratch files.
pub async fn write_track(
    track: &CaptionTrack,
    path: impl AsRef<Path>,
    play_width: u32,
    play_height: u32,
) -> MediaResult<()> {
    let doc = render_track(track, play_width, play_height);
    tokio::fs::write(path.as_ref(), doc).await?;
    Ok(())
}

fn dialogue_line(event: &WordEvent) -> String {
    let style = if event.is_hook { STYLE_HOOK } else { STYLE_WORD };
    format!(
        "Dialogue: 0,{},{},{},,0,0,0,,{}",
        ass_timestamp(event.start),
        ass_timestamp(event.end),
        style,
        escape_text(&event.text)
    )
}

/// Format seconds as the ASS `H:MM:SS.cc` timestamp.
fn ass_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let total_cs = (seconds * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let s = total_secs % 60;
    let m = (total_secs / 60) % 60;
    let h = total_secs / 3600;
    format!("{}:{:02}:{:02}.{:02}", h, m, s, cs)
}

/// Strip characters that ASS treats as markup.
fn escape_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '{' | '}' | '\\'))
        .collect::<String>()
        .replace('\n', " ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ass_timestamp() {
        assert_eq!(ass_timestamp(0.0), "0:00:00.00");
        assert_eq!(ass_timestamp(1.25), "0:00:01.25");
        assert_eq!(ass_timestamp(61.5), "0:01:01.50");
        assert_eq!(ass_timestamp(3661.0), "1:01:01.00");
    }

    #[test]
    fn test_dialogue_styles() {
        let plain = WordEvent::new(0.0, 0.5, "hello", false);
        let hook = WordEvent::new(0.5, 1.0, "amazing", true);

        assert!(dialogue_line(&plain).contains(",Word,"));
        assert!(dialogue_line(&hook).contains(",Hook,"));
        assert!(dialogue_line(&plain).ends_with("HELLO"));
    }

    #[test]
    fn test_render_document_structure() {
        let track = CaptionTrack {
            events: vec![
                WordEvent::new(0.0, 0.4, "one", false),
                WordEvent::new(0.4, 1.0, "two", true),
            ],
        };

        let doc = render_track(&track, 720, 1280);
        assert!(doc.contains("[Script Info]"));
        assert!(doc.contains("PlayResX: 720"));
        assert!(doc.contains("[V4+ Styles]"));
        assert_eq!(doc.matches("Dialogue:").count(), 2);
    }

    #[test]
    fn test_markup_stripped() {
        let event = WordEvent::new(0.0, 0.5, "a{b}\\c", false);
        let line = dialogue_line(&event);
        assert!(line.ends_with("ABC"));
    }
}
