use boxdb::{Binding, BufferBuilder, BufferError, Error};
use boxdb_testing_fixtures::{Reading, ReadingBinding, Task, TaskBinding};
use proptest::prelude::*;

fn task_strategy() -> impl Strategy<Value = Task> {
    (
        any::<u64>(),
        ".{0,24}",
        any::<i32>(),
        any::<bool>(),
        proptest::collection::vec(any::<u8>(), 0..64),
        -1.0e12f64..1.0e12,
    )
        .prop_map(|(id, text, priority, done, payload, ratio)| Task {
            id,
            text,
            priority,
            done,
            payload,
            ratio,
        })
}

prop_compose! {
    fn reading_strategy()(
        id in any::<u64>(),
        sensor in "[a-z0-9-]{0,16}",
        level in any::<i8>(),
        delta in any::<i16>(),
        channel in any::<u16>(),
        taken_at in any::<i64>(),
        sequence in any::<u32>(),
        quality in any::<u8>(),
        drift in any::<i32>(),
        index in any::<u32>(),
        unit in any::<char>(),
        value in -1.0e6f32..1.0e6,
        raw in any::<u64>(),
    ) -> Reading {
        Reading {
            id,
            sensor,
            level,
            delta,
            channel,
            taken_at,
            sequence,
            quality,
            drift: drift as isize,
            index: index as usize,
            unit,
            value,
            raw,
        }
    }
}

proptest! {
    #[test]
    fn task_survives_encode_decode(task in task_strategy()) {
        let bytes = TaskBinding.encode(&task, task.id).expect("encode");
        let decoded = TaskBinding.to_object(&bytes).expect("decode");

        prop_assert_eq!(decoded, task);
    }

    #[test]
    fn reading_survives_encode_decode(reading in reading_strategy()) {
        let bytes = ReadingBinding.encode(&reading, reading.id).expect("encode");
        let decoded = ReadingBinding.to_object(&bytes).expect("decode");

        prop_assert_eq!(decoded, reading);
    }
}

#[test]
fn default_record_encodes_to_an_empty_table() {
    let bytes = TaskBinding.encode(&Task::default(), 0).expect("encode");
    let table = boxdb::Table::root(&bytes).expect("root");

    assert_eq!(table.slot_count(), 6);
    for slot in 0..6u16 {
        let present = table.has_slot(4 + 2 * slot).expect("slot");
        // empty string and empty bytes still get a child region
        assert_eq!(present, slot == 1 || slot == 4, "slot {slot}");
    }

    assert_eq!(TaskBinding.to_object(&bytes).expect("decode"), Task::default());
}

#[test]
fn absent_slots_decode_to_zero_values() {
    let mut fbb = BufferBuilder::new();
    fbb.start_table(6).expect("table");
    fbb.push_slot::<u64>(0, 9, 0).expect("id");
    fbb.push_slot::<i32>(2, 7, 0).expect("priority");
    let bytes = fbb.finish().expect("finish");

    let task = TaskBinding.to_object(&bytes).expect("decode");
    assert_eq!(
        task,
        Task {
            id: 9,
            priority: 7,
            ..Task::default()
        }
    );
}

#[test]
fn buffers_from_newer_models_still_decode() {
    // two extra trailing slots the binding does not know about
    let mut fbb = BufferBuilder::new();
    let text = fbb.create_string("hi").expect("text");
    let extra = fbb.create_string("future").expect("extra");
    fbb.start_table(8).expect("table");
    fbb.push_slot::<u64>(0, 3, 0).expect("id");
    fbb.push_offset_slot(1, text).expect("text slot");
    fbb.push_slot::<bool>(3, true, false).expect("done");
    fbb.push_offset_slot(7, extra).expect("extra slot");
    let bytes = fbb.finish().expect("finish");

    let task = TaskBinding.to_object(&bytes).expect("decode");
    assert_eq!(task.id, 3);
    assert_eq!(task.text, "hi");
    assert!(task.done);
}

#[test]
fn buffers_from_older_models_still_decode() {
    let mut fbb = BufferBuilder::new();
    fbb.start_table(2).expect("table");
    fbb.push_slot::<u64>(0, 5, 0).expect("id");
    let bytes = fbb.finish().expect("finish");

    let reading = ReadingBinding.to_object(&bytes).expect("decode");
    assert_eq!(
        reading,
        Reading {
            id: 5,
            ..Reading::default()
        }
    );
}

#[test]
fn supplied_id_replaces_the_record_id() {
    let task = Task {
        id: 1,
        ..Task::new("x", 2)
    };

    let bytes = TaskBinding.encode(&task, 44).expect("encode");
    assert_eq!(TaskBinding.to_object(&bytes).expect("decode").id, 44);
}

#[test]
fn char_and_unsigned_values_keep_their_bits() {
    let reading = Reading {
        id: 1,
        unit: '°',
        raw: u64::MAX,
        channel: u16::MAX,
        quality: u8::MAX,
        sequence: u32::MAX,
        ..Reading::default()
    };

    let bytes = ReadingBinding.encode(&reading, 1).expect("encode");
    assert_eq!(ReadingBinding.to_object(&bytes).expect("decode"), reading);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn platform_ints_outside_32_bits_fail_to_encode() {
    let reading = Reading {
        drift: isize::MAX,
        ..Reading::default()
    };
    let err = ReadingBinding.encode(&reading, 1).expect_err("drift overflows");
    assert!(
        matches!(err, Error::Buffer(BufferError::SlotOverflow { slot: 8 })),
        "unexpected error: {err:?}"
    );

    let reading = Reading {
        index: usize::MAX,
        ..Reading::default()
    };
    let err = ReadingBinding.encode(&reading, 1).expect_err("index overflows");
    assert!(
        matches!(err, Error::Buffer(BufferError::SlotOverflow { slot: 9 })),
        "unexpected error: {err:?}"
    );
}

#[test]
fn truncated_buffers_are_decode_errors() {
    let bytes = TaskBinding
        .encode(&Task::new("something long enough", 3), 1)
        .expect("encode");

    let err = TaskBinding
        .to_object(&bytes[..bytes.len() - 3])
        .expect_err("truncated");
    assert!(matches!(err, Error::Decode(_)), "unexpected error: {err:?}");
}
