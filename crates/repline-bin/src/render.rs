//! Full-redraw renderer for the console.
//!
//! `build_frame` turns a session into styled lines (pure, tested); `draw`
//! paints them. Only the tail that fits the terminal height is kept; no
//! wrapping or scrollback.

use core_state::{LogKind, Session};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanStyle {
    Plain,
    Error,
    Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Span {
    pub text: String,
    pub style: SpanStyle,
}

pub(crate) type Line = Vec<Span>;

fn push(line: &mut Line, text: &str, style: SpanStyle) {
    if text.is_empty() {
        return;
    }
    match line.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => line.push(Span {
            text: text.to_string(),
            style,
        }),
    }
}

/// Lay out the transcript followed by the prompt line(s), keeping the last
/// `rows` lines.
pub(crate) fn build_frame(
    session: &Session,
    prompt: &str,
    cursor_visible: bool,
    rows: usize,
) -> Vec<Line> {
    let indent = " ".repeat(prompt.chars().count());
    let mut lines: Vec<Line> = Vec::new();

    for entry in session.transcript() {
        let (prefix, continuation, style) = match entry.kind {
            LogKind::Input => (prompt, indent.as_str(), SpanStyle::Plain),
            LogKind::Output => ("", "", SpanStyle::Plain),
            LogKind::Error => ("", "", SpanStyle::Error),
        };
        for (i, part) in entry.text.split('\n').enumerate() {
            let mut line = Line::new();
            let lead = if i == 0 { prefix } else { continuation };
            push(&mut line, lead, SpanStyle::Plain);
            push(&mut line, part, style);
            lines.push(line);
        }
    }

    let editor = session.editor();
    let cursor = editor.cursor();
    let mut line = Line::new();
    push(&mut line, prompt, SpanStyle::Plain);
    let mut buf = [0u8; 4];
    for (idx, ch) in editor.text().chars().enumerate() {
        let at_cursor = cursor_visible && idx == cursor;
        if ch == '\n' {
            // A line break under the cursor still needs a visible cell.
            if at_cursor {
                push(&mut line, " ", SpanStyle::Cursor);
            }
            lines.push(std::mem::take(&mut line));
            push(&mut line, &indent, SpanStyle::Plain);
        } else {
            let style = if at_cursor {
                SpanStyle::Cursor
            } else {
                SpanStyle::Plain
            };
            push(&mut line, ch.encode_utf8(&mut buf), style);
        }
    }
    if cursor_visible && cursor == editor.len_chars() {
        push(&mut line, " ", SpanStyle::Cursor);
    }
    lines.push(line);

    let rows = rows.max(1);
    if lines.len() > rows {
        lines.drain(..lines.len() - rows);
    }
    lines
}

pub(crate) fn draw<W: Write>(out: &mut W, frame: &[Line]) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in frame.iter().enumerate() {
        queue!(out, MoveTo(0, u16::try_from(row).unwrap_or(u16::MAX)))?;
        for span in line {
            match span.style {
                SpanStyle::Plain => queue!(out, Print(&span.text))?,
                SpanStyle::Error => queue!(out, PrintStyledContent(span.text.as_str().red()))?,
                SpanStyle::Cursor => {
                    queue!(out, PrintStyledContent(span.text.as_str().reverse()))?
                }
            }
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(text: &str) -> Span {
        Span {
            text: text.into(),
            style: SpanStyle::Plain,
        }
    }

    fn cursor(text: &str) -> Span {
        Span {
            text: text.into(),
            style: SpanStyle::Cursor,
        }
    }

    fn flatten(frame: &[Line]) -> Vec<String> {
        frame
            .iter()
            .map(|l| l.iter().map(|s| s.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn empty_session_shows_prompt_and_cursor_cell() {
        let s = Session::without_banner();
        let frame = build_frame(&s, "> ", true, 10);
        assert_eq!(frame, vec![vec![plain("> "), cursor(" ")]]);
    }

    #[test]
    fn blurred_console_draws_no_cursor() {
        let mut s = Session::without_banner();
        s.editor_mut().insert_at("ab");
        let frame = build_frame(&s, "> ", false, 10);
        assert_eq!(frame, vec![vec![plain("> ab")]]);
    }

    #[test]
    fn cursor_mid_line_is_reverse_video() {
        let mut s = Session::without_banner();
        s.editor_mut().insert_at("abc");
        s.editor_mut().move_left();
        let frame = build_frame(&s, "> ", true, 10);
        assert_eq!(frame, vec![vec![plain("> ab"), cursor("c")]]);
    }

    #[test]
    fn newline_under_cursor_renders_as_space_then_break() {
        let mut s = Session::without_banner();
        s.editor_mut().insert_at("a\nb");
        s.editor_mut().move_home();
        s.editor_mut().move_right();
        let frame = build_frame(&s, "> ", true, 10);
        assert_eq!(
            frame,
            vec![vec![plain("> a"), cursor(" ")], vec![plain("  b")]]
        );
    }

    #[test]
    fn transcript_entries_are_prefixed_and_styled() {
        let mut s = Session::new("hello");
        s.editor_mut().insert_at("x\ny");
        submit_failing(&mut s);
        let frame = build_frame(&s, "> ", false, 10);
        assert_eq!(
            flatten(&frame),
            vec!["hello", "> x", "  y", "boom", "> "]
        );
        assert_eq!(frame[3][0].style, SpanStyle::Error);
    }

    fn submit_failing(s: &mut Session) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let failing = core_state::FnEvaluator::new(|_: &str| -> anyhow::Result<String> {
            anyhow::bail!("boom")
        });
        rt.block_on(s.submit(&failing));
    }

    #[test]
    fn only_the_tail_fits() {
        let mut s = Session::new("one\ntwo\nthree");
        s.editor_mut().insert_at("q");
        let frame = build_frame(&s, "$ ", false, 2);
        assert_eq!(flatten(&frame), vec!["three", "$ q"]);
    }

    #[test]
    fn draw_emits_text_and_styles() {
        let error = Span {
            text: "bad".into(),
            style: SpanStyle::Error,
        };
        let frame = vec![vec![plain("> "), cursor(" ")], vec![error]];
        let mut out = Vec::new();
        draw(&mut out, &frame).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("> "));
        assert!(s.contains("bad"));
        assert!(s.contains("\x1b[7m"), "reverse video missing: {s:?}");
    }
}
