//! Unit tests for boundary-driven frame reassembly.

use proptest::prelude::*;
use rstest::{fixture, rstest};

use super::*;
use crate::datagram::{DatagramHeader, FrameCount, HEADER_LEN, PacketIndex};

fn datagram(frame: u16, index: u8, payload: &[u8]) -> Vec<u8> {
    let mut raw = DatagramHeader::new(FrameCount::new(frame), PacketIndex::new(index))
        .encode()
        .to_vec();
    raw.extend_from_slice(payload);
    raw
}

#[fixture]
fn reassembler() -> FrameReassembler { FrameReassembler::new() }

#[rstest]
fn emits_previous_frame_when_next_frame_starts(mut reassembler: FrameReassembler) {
    assert!(reassembler.ingest(&datagram(1, 0, b"AA")).is_none());
    assert!(reassembler.ingest(&datagram(1, 1, b"BB")).is_none());

    let frame = reassembler
        .ingest(&datagram(2, 0, b"CC"))
        .expect("frame start should emit the previous frame");

    assert_eq!(frame.payload(), b"AABB");
    assert_eq!(frame.frame_count(), FrameCount::new(1));
    assert_eq!(frame.datagrams(), 2);
    assert_eq!(reassembler.buffered(), b"CC");
    assert_eq!(reassembler.last_frame_count(), Some(FrameCount::new(2)));
}

#[rstest]
fn lost_tail_still_emits_received_bytes(mut reassembler: FrameReassembler) {
    assert!(reassembler.ingest(&datagram(5, 0, b"X")).is_none());
    let frame = reassembler
        .ingest(&datagram(6, 0, b"Y"))
        .expect("frame start should emit the truncated frame");
    assert_eq!(frame.payload(), b"X");
    assert_eq!(reassembler.buffered(), b"Y");
}

#[rstest]
fn bytes_before_first_frame_start_are_never_emitted(mut reassembler: FrameReassembler) {
    assert!(reassembler.ingest(&datagram(3, 4, b"stale")).is_none());
    assert!(reassembler.ingest(&datagram(3, 5, b"tail")).is_none());
    assert_eq!(reassembler.state(), ReassemblyState::AwaitingSync);
    assert_eq!(reassembler.buffered(), b"staletail");

    assert!(reassembler.ingest(&datagram(4, 0, b"head")).is_none());
    assert_eq!(reassembler.state(), ReassemblyState::Accumulating);
    assert_eq!(reassembler.buffered(), b"head");

    let frame = reassembler
        .ingest(&datagram(5, 0, b"next"))
        .expect("second frame start emits");
    assert_eq!(frame.payload(), b"head");
}

#[rstest]
#[case::empty(0)]
#[case::short(3)]
#[case::header_only(HEADER_LEN)]
fn short_datagram_is_a_no_op(mut reassembler: FrameReassembler, #[case] len: usize) {
    reassembler.ingest(&datagram(1, 0, b"AB"));
    let before = reassembler.buffered().to_vec();

    let outcome = reassembler.ingest_datagram(&vec![0_u8; len]);

    assert_eq!(outcome, IngestOutcome::Discarded);
    assert_eq!(reassembler.buffered(), before.as_slice());
    assert_eq!(reassembler.last_frame_count(), Some(FrameCount::new(1)));
}

#[rstest]
fn short_datagram_does_not_synchronise(mut reassembler: FrameReassembler) {
    // A zero-filled header would read as a frame start if it were parsed.
    reassembler.ingest(&[0_u8; HEADER_LEN]);
    assert_eq!(reassembler.state(), ReassemblyState::AwaitingSync);
    assert_eq!(reassembler.last_frame_count(), None);
}

#[rstest]
fn back_to_back_frame_starts_emit_minimal_frame(mut reassembler: FrameReassembler) {
    reassembler.ingest(&datagram(10, 0, b"a"));
    let frame = reassembler
        .ingest(&datagram(11, 0, b"b"))
        .expect("consecutive frame starts emit");
    assert_eq!(frame.payload(), b"a");
    assert_eq!(frame.datagrams(), 1);
    assert_eq!(reassembler.buffered(), b"b");
}

#[rstest]
fn out_of_order_payloads_are_appended_in_receipt_order(mut reassembler: FrameReassembler) {
    reassembler.ingest(&datagram(1, 0, b"0"));
    reassembler.ingest(&datagram(1, 2, b"2"));
    reassembler.ingest(&datagram(1, 1, b"1"));
    reassembler.ingest(&datagram(1, 1, b"1"));

    assert_eq!(reassembler.out_of_order_indices(), 1);
    let frame = reassembler
        .ingest(&datagram(2, 0, b"x"))
        .expect("frame start emits");
    assert_eq!(frame.payload(), b"0211");
    assert_eq!(frame.datagrams(), 4);
}

#[rstest]
fn frame_start_outcome_reports_counter(mut reassembler: FrameReassembler) {
    let first = reassembler.ingest_datagram(&datagram(49, 0, b"a"));
    assert_eq!(
        first,
        IngestOutcome::FrameStarted {
            frame_count: FrameCount::new(49),
            completed: None,
        }
    );
    assert_eq!(
        reassembler.ingest_datagram(&datagram(49, 1, b"b")),
        IngestOutcome::Appended
    );

    let IngestOutcome::FrameStarted {
        frame_count,
        completed,
    } = reassembler.ingest_datagram(&datagram(50, 0, b"c"))
    else {
        panic!("expected a frame start");
    };
    assert_eq!(frame_count, FrameCount::new(50));
    assert_eq!(completed.map(CompletedFrame::into_payload).as_deref(), Some(&b"ab"[..]));
}

#[rstest]
fn frame_counter_wraps_without_special_handling(mut reassembler: FrameReassembler) {
    reassembler.ingest(&datagram(u16::MAX, 0, b"end"));
    let frame = reassembler
        .ingest(&datagram(0, 0, b"start"))
        .expect("wrapped counter still marks a boundary");
    assert_eq!(frame.frame_count(), FrameCount::new(u16::MAX));
    assert_eq!(reassembler.last_frame_count(), Some(FrameCount::new(0)));
}

#[test]
fn jpeg_marker_probe_requires_both_markers() {
    let whole = CompletedFrame::new(FrameCount::new(1), 1, vec![0xFF, 0xD8, 1, 2, 0xFF, 0xD9]);
    let truncated = CompletedFrame::new(FrameCount::new(1), 1, vec![0xFF, 0xD8, 1, 2]);
    let headless = CompletedFrame::new(FrameCount::new(1), 1, vec![1, 2, 0xFF, 0xD9]);
    assert!(whole.has_jpeg_markers());
    assert!(!truncated.has_jpeg_markers());
    assert!(!headless.has_jpeg_markers());
}

#[derive(Clone, Debug)]
struct Sent {
    index: u8,
    payload: Vec<u8>,
}

fn sent_strategy() -> impl Strategy<Value = Sent> {
    (0_u8..4, proptest::collection::vec(any::<u8>(), 1..16))
        .prop_map(|(index, payload)| Sent { index, payload })
}

proptest! {
    #[test]
    fn frame_starts_minus_one_frames_are_emitted(
        stream in proptest::collection::vec(sent_strategy(), 0..64),
    ) {
        let mut reassembler = FrameReassembler::new();
        let mut emitted = Vec::new();
        for (position, sent) in stream.iter().enumerate() {
            let frame = u16::try_from(position).unwrap_or(u16::MAX);
            if let Some(done) = reassembler.ingest(&datagram(frame, sent.index, &sent.payload)) {
                emitted.push(done);
            }
        }

        let starts = stream.iter().filter(|sent| sent.index == 0).count();
        prop_assert_eq!(emitted.len(), starts.saturating_sub(1));
    }

    #[test]
    fn emitted_frames_concatenate_payloads_between_starts(
        stream in proptest::collection::vec(sent_strategy(), 0..64),
    ) {
        let mut expected = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        for sent in &stream {
            if sent.index == 0 {
                if let Some(done) = current.take() {
                    expected.push(done);
                }
                current = Some(Vec::new());
            }
            if let Some(buffer) = current.as_mut() {
                buffer.extend_from_slice(&sent.payload);
            }
        }

        let mut reassembler = FrameReassembler::new();
        let emitted: Vec<Vec<u8>> = stream
            .iter()
            .filter_map(|sent| reassembler.ingest(&datagram(7, sent.index, &sent.payload)))
            .map(|frame| frame.payload().to_vec())
            .collect();

        prop_assert_eq!(emitted, expected);
        if let Some(pending) = current {
            prop_assert_eq!(reassembler.buffered(), pending.as_slice());
        }
    }
}
