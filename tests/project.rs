mod common;

use bandfile::{format::TEXT_KIND_RTF, prelude::*};
use common::*;
use plist::{Dictionary, Uid, Value};
use pretty_assertions::assert_eq;

const PIANO: [u8; 4] = [0xC1, 0x00, 0x00, 0x01];

fn uid(n: u64) -> Value {
    Value::Uid(Uid::new(n))
}

fn container(keys: &[u64], values: &[u64]) -> Value {
    let mut d = Dictionary::new();
    d.insert("NS.keys".into(), Value::Array(keys.iter().map(|&k| uid(k)).collect()));
    d.insert("NS.objects".into(), Value::Array(values.iter().map(|&v| uid(v)).collect()));
    Value::Dictionary(d)
}

fn drummer_archive(names: &[&str]) -> Value {
    let mut objects = vec![
        Value::String("$null".into()),
        container(&[2], &[3]),
        Value::String("genInstDrummerBaseModel.state".into()),
        container(&[4], &[5]),
        Value::String("drummerModelTrackStates".into()),
    ];
    // track states container at 5, its keys and values follow
    let n = names.len() as u64;
    let keys: Vec<u64> = (0..n).map(|i| 7 + i).collect();
    let states: Vec<u64> = (0..n).map(|i| 7 + n + i).collect();
    objects.push(container(&keys, &states));
    objects.push(Value::String("selectedCharacterIdentifier".into()));
    for i in 0..n {
        objects.push(Value::String(format!("track {i}")));
    }
    for i in 0..n {
        objects.push(container(&[6], &[7 + 2 * n + i]));
    }
    for name in names {
        objects.push(Value::String((*name).into()));
    }

    let mut top = Dictionary::new();
    top.insert("root".into(), uid(1));
    let mut archive = Dictionary::new();
    archive.insert("$top".into(), Value::Dictionary(top));
    archive.insert("$objects".into(), Value::Array(objects));
    Value::Dictionary(archive)
}

fn full_project() -> Vec<u8> {
    ProjectBuilder::new()
        .metronome(true)
        .part(section_chunk(&[(1, 7680), (2, 15360)]))
        .part(text_chunk(1, 0, "Intro"))
        .part(text_chunk(
            2,
            TEXT_KIND_RTF,
            "{\\rtf1\\ansi{\\fonttbl\\f0 Helvetica;}\n\\f0\\fs24 Chorus",
        ))
        .part(transposition_chunk(&[(0, 0), (7680, 2)]))
        .arrangement(&[event_record(32, event_start(3840), 1, None, PIANO)])
        // the archive runs up to the next header tag, here the track layout
        .part(drummer_chunk(&drummer_archive(&["Kyle", "Logan"])))
        .part(track_layout(&[1, 2]))
        .part(label_chunk(1, "Grand Piano"))
        .part(label_chunk(2, "Strings"))
        .region(PIANO, "Piano", 0, 3840, &[note_record(note_time(0), 100, 60, 480)])
        .part(master_strip(true))
        .part(channel_strip("Inst 1", [3, 5], Some(1.0)))
        .part(audio_loop("Upbeat Party Groove.caf"))
        .build()
}

#[test]
fn decodes_every_part() {
    let bytes = full_project();
    let decoded = Project::decode(&bytes).unwrap();
    assert!(decoded.is_clean());
    let project = decoded.value;

    assert_eq!(
        project.sections().unwrap(),
        [
            Section {
                label: "Intro".into(),
                duration: 7680
            },
            Section {
                label: "Chorus".into(),
                duration: 15360
            },
        ]
    );
    assert_eq!(project.drummers(), ["Kyle", "Logan"]);
    assert_eq!(
        project.transposition(),
        [
            TranspositionPoint { time: 0, value: 0.0 },
            TranspositionPoint {
                time: 7680,
                value: 2.0
            },
        ]
    );
    assert_eq!(
        project.instrument(),
        Some(&ChannelStrip {
            gain: Some(1.0),
            send1: 3,
            send2: 5,
        })
    );
    assert!(project.metronome());
    assert_eq!(project.audio_loops(), ["Upbeat Party Groove.caf"]);
    assert_eq!(project.default_master_track(), Some(true));

    let tracks = project.tracks();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[&1].label(), Some("Grand Piano"));
    assert_eq!(tracks[&1].notes(), [Note::new(3840, 100, 60, 480)]);
    assert_eq!(tracks[&2].kind(), TrackKind::Empty);
}

#[test]
fn optional_parts_may_be_missing() {
    let bytes = ProjectBuilder::new()
        .arrangement(&[])
        .part(track_layout(&[]))
        .build();
    let project = Project::decode(&bytes).unwrap().value;

    assert!(project.sections().is_none());
    assert!(project.tracks().is_empty());
    assert!(project.drummers().is_empty());
    assert!(project.transposition().is_empty());
    assert!(project.instrument().is_none());
    assert!(!project.metronome());
    assert!(project.audio_loops().is_empty());
    assert_eq!(project.default_master_track(), None);
}

#[test]
fn other_instrument_strip() {
    let bytes = ProjectBuilder::new()
        .arrangement(&[])
        .part(track_layout(&[]))
        .part(channel_strip("Inst 1", [1, 2], None))
        .part(channel_strip("Inst 2", [7, 8], Some(0.5)))
        .build();
    let project = Project::decode_with_instrument(&bytes, "Inst 2").unwrap().value;
    assert_eq!(
        project.instrument(),
        Some(&ChannelStrip {
            gain: Some(0.5),
            send1: 7,
            send2: 8,
        })
    );
}

#[test]
fn section_without_text_fails() {
    let bytes = ProjectBuilder::new()
        .part(section_chunk(&[(1, 3840), (9, 3840)]))
        .part(text_chunk(1, 0, "Verse"))
        .arrangement(&[])
        .part(track_layout(&[]))
        .build();
    let sections = bandfile::sections::decode(&Reader::from_byte_slice(&bytes)).unwrap_err();
    assert!(sections.is_tag_not_found());
    // a section chunk that cannot be named is treated as missing
    assert!(Project::decode(&bytes).unwrap().value.sections().is_none());
}

#[test]
fn broken_required_part_fails() {
    let bytes = ProjectBuilder::new().part(track_layout(&[1])).build();
    let err = Project::decode(&bytes).unwrap_err();
    assert!(err.is_tag_not_found());
}

#[test]
fn materialized_track() {
    let bytes = full_project();
    let project = Project::decode(&bytes).unwrap().value;
    let midi = materialize(project.tracks()[&1].notes());
    assert_eq!(midi.origin, 0);
    assert_eq!(
        midi.events,
        [
            DeltaEvent {
                delta: 3840,
                message: NoteMessage::NoteOn {
                    pitch: 60,
                    velocity: 100
                },
            },
            DeltaEvent {
                delta: 480,
                message: NoteMessage::NoteOff { pitch: 60 },
            },
        ]
    );
}
