// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End to end behavior of a [`Readline`] session driven through its public API, with a
//! [`SurfaceMock`] standing in for the terminal.

use pretty_assertions::assert_eq;
use r3bl_readline_core::{EditEvent, History, InMemoryHistoryStore, LineState, Readline,
                         ReadlineConfig, ReadlineError, StdMutex, SurfaceMock,
                         TerminalGeometry, TerminalOutput, balanced_brackets_check_handler,
                         decode_chunk, gen_input_stream, identity_highlighter,
                         lock_or_recover};
use std::sync::Arc;

fn attached_readline(surface: &SurfaceMock) -> Readline {
    let mut readline = Readline::new(&ReadlineConfig::default()).unwrap();
    readline.attach(Box::new(surface.clone()));
    readline
}

fn standalone_line_state(surface: &SurfaceMock) -> (LineState, TerminalOutput) {
    let output = TerminalOutput::new_with_default_watermark(Box::new(surface.clone()));
    let line_state = LineState::new(
        "> ",
        output.geometry(),
        Arc::new(StdMutex::new(History::new(10))),
        identity_highlighter(),
    );
    (line_state, output)
}

#[test]
fn test_insert_delete_keeps_length_and_cursor_in_bounds() {
    let surface = SurfaceMock::new(TerminalGeometry::new(12, 10));
    let (mut line_state, mut output) = standalone_line_state(&surface);

    let mut expected_len: usize = 0;
    let steps: Vec<(&str, usize)> = vec![
        ("insert", 5),
        ("backspace", 2),
        ("left", 2),
        ("insert", 20),
        ("delete", 3),
        ("backspace", 40),
        ("insert", 1),
        ("delete", 5),
        ("left", 10),
        ("delete", 1),
    ];

    for (op, count) in steps {
        match op {
            "insert" => {
                line_state.insert_text(&"x".repeat(count), &mut output).unwrap();
                expected_len += count;
            }
            "backspace" => {
                let removable = line_state.cursor().min(count);
                line_state.backspace(count, &mut output).unwrap();
                expected_len -= removable;
            }
            "delete" => {
                let removable = (line_state.char_count() - line_state.cursor()).min(count);
                line_state.forward_delete(count, &mut output).unwrap();
                expected_len -= removable;
            }
            _ => line_state.move_cursor_back(count, &mut output).unwrap(),
        }
        assert_eq!(line_state.char_count(), expected_len);
        assert!(line_state.cursor() <= line_state.char_count());
    }
}

#[test]
fn test_refresh_and_clear_screen_are_idempotent() {
    let surface = SurfaceMock::new(TerminalGeometry::new(10, 10));
    let (mut line_state, mut output) = standalone_line_state(&surface);
    line_state.insert_text("hello world", &mut output).unwrap();
    line_state.move_cursor_back(3, &mut output).unwrap();

    let snapshot = (line_state.buffer().to_string(), line_state.cursor());

    surface.clear_writes();
    line_state.refresh(&mut output).unwrap();
    let first = surface.get_copy_of_output();
    surface.clear_writes();
    line_state.refresh(&mut output).unwrap();
    let second = surface.get_copy_of_output();
    assert_eq!(first, second);
    assert_eq!((line_state.buffer().to_string(), line_state.cursor()), snapshot);

    surface.clear_writes();
    line_state.clear_screen(&mut output).unwrap();
    let first = surface.get_copy_of_output();
    surface.clear_writes();
    line_state.clear_screen(&mut output).unwrap();
    let second = surface.get_copy_of_output();
    assert_eq!(first, second);
    assert_eq!((line_state.buffer().to_string(), line_state.cursor()), snapshot);
}

#[test]
fn test_history_up_then_down_restores_in_progress_line() {
    let surface = SurfaceMock::default();
    let mut readline = attached_readline(&surface);
    readline.add_history_entry("a");
    readline.add_history_entry("b");

    let _pending_read = readline.read("> ");
    readline.handle_data("draft");

    readline.handle_data("\x1b[A");
    assert_eq!(readline.buffer(), Some("b"));
    readline.handle_data("\x1b[B");
    assert_eq!(readline.buffer(), Some("draft"));
    assert_eq!(readline.line_state().map(LineState::cursor), Some(5));
}

#[test]
fn test_history_capacity_evicts_oldest() {
    let surface = SurfaceMock::default();
    let config = ReadlineConfig {
        history_capacity: 3,
        ..ReadlineConfig::default()
    };
    let mut readline = Readline::new(&config).unwrap();
    readline.attach(Box::new(surface));

    for line in ["one", "two", "three", "four", "five"] {
        let mut pending_read = readline.read("> ");
        readline.handle_data(line);
        readline.handle_data("\r");
        assert_eq!(pending_read.try_get_result(), Some(Ok(line.to_string())));
    }

    assert_eq!(lock_or_recover(&readline.safe_history()).to_vec(), vec![
        "three".to_string(),
        "four".to_string(),
        "five".to_string(),
    ]);
}

#[test]
fn test_blank_lines_are_not_added_to_history() {
    let store = InMemoryHistoryStore::default();
    let history = History::with_store(10, Box::new(store.clone()));
    let mut readline =
        Readline::new_with_history(&ReadlineConfig::default(), history).unwrap();
    readline.attach(Box::new(SurfaceMock::default()));

    for line in ["", "   "] {
        let mut pending_read = readline.read("> ");
        readline.handle_data(line);
        readline.handle_data("\r");
        assert_eq!(pending_read.try_get_result(), Some(Ok(line.to_string())));
    }

    assert!(lock_or_recover(&readline.safe_history()).is_empty());
    assert!(store.get_copy_of_entries().is_empty());
}

#[test]
fn test_watermark_hysteresis_with_out_of_order_acks() {
    let surface = SurfaceMock::default().with_deferred_acks();
    let mut readline = attached_readline(&surface);
    assert!(readline.accepting_input());

    // Three writes adding up to 10_001 outstanding bytes.
    readline.print(&"a".repeat(5_001));
    readline.print(&"b".repeat(4_001));
    readline.print(&"c".repeat(999));
    assert!(!readline.accepting_input());

    // 5_000 outstanding, between the thresholds.
    assert!(surface.ack(0));
    assert!(!readline.accepting_input());

    // 999 outstanding, below the low watermark.
    assert!(surface.ack(1));
    assert!(readline.accepting_input());

    assert!(surface.ack(2));
    assert!(readline.accepting_input());
    assert_eq!(surface.pending_ack_count(), 0);
}

#[test]
fn test_paste_turns_submits_into_soft_newlines() {
    let decoded = decode_chunk("one\rtwo\rthree");
    assert!(decoded.is_paste());
    let events = decoded.into_consumer_events();
    assert!(!events.iter().any(|event| *event == EditEvent::Submit));
    assert_eq!(
        events
            .iter()
            .filter(|event| **event == EditEvent::SoftNewline)
            .count(),
        2
    );

    let surface = SurfaceMock::default();
    let mut readline = attached_readline(&surface);
    let mut pending_read = readline.read("> ");
    let write_count_before = surface.write_count();
    readline.handle_data("one\rtwo\rthree");

    assert_eq!(pending_read.try_get_result(), None);
    assert_eq!(readline.buffer(), Some("one\ntwo\nthree"));
    // One redraw for the whole paste.
    assert_eq!(surface.write_count(), write_count_before + 1);
}

#[tokio::test]
async fn test_check_handler_gates_submission() {
    let surface = SurfaceMock::default();
    let mut readline = attached_readline(&surface);
    readline.set_check_handler(balanced_brackets_check_handler());

    let mut pending_read = readline.read("> ");
    readline.handle_data("(a");
    readline.handle_data("\r");
    assert_eq!(pending_read.try_get_result(), None);
    assert_eq!(readline.buffer(), Some("(a\n"));

    readline.handle_data("\x15");
    readline.handle_data("(a)");
    readline.handle_data("\r");
    assert_eq!(pending_read.await, Ok("(a)".to_string()));
}

#[tokio::test]
async fn test_aborted_read_is_not_resurrected_by_input() {
    let surface = SurfaceMock::default();
    let mut readline = attached_readline(&surface);

    let pending_read = readline.read("> ");
    readline.handle_data("abc");
    readline.abort();
    readline.handle_data("\r");
    readline.handle_data("more");

    assert_eq!(pending_read.await, Err(ReadlineError::Aborted));
    assert!(!readline.is_reading());
    assert_eq!(readline.buffer(), None);
    assert!(lock_or_recover(&readline.safe_history()).is_empty());
}

#[tokio::test]
async fn test_read_without_surface_is_not_active() {
    let mut readline = Readline::new(&ReadlineConfig::default()).unwrap();
    assert_eq!(readline.read("> ").await, Err(ReadlineError::NotActive));

    readline.attach(Box::new(SurfaceMock::default()));
    drop(readline.detach());
    assert_eq!(readline.read("> ").await, Err(ReadlineError::NotActive));
}

#[tokio::test]
async fn test_read_line_from_stream_with_multi_line_continuation() {
    let surface = SurfaceMock::default();
    let mut readline = attached_readline(&surface);
    readline.set_check_handler(balanced_brackets_check_handler());

    let mut stream = gen_input_stream(vec![
        "fn(".to_string(),
        "\r".to_string(),
        "x)".to_string(),
        "\r".to_string(),
        "ignored".to_string(),
    ]);
    let result = readline.read_line_from_stream("> ", &mut stream).await;
    assert_eq!(result, Ok("fn(\nx)".to_string()));
}
