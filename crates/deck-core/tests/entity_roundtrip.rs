//! Serde roundtrip and JsonSchema validation tests for the wire types.

use chrono::Utc;
use schemars::schema_for;
use deck_core::board::Board;
use deck_core::entities::*;
use deck_core::enums::*;
use deck_core::focus::{FocusSession, FocusSnapshot};
use deck_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_task(chunk_id: Option<&str>) -> Task {
    Task {
        id: "tsk-a3f8b2c1".into(),
        title: "write report".into(),
        description: String::new(),
        schedule: Schedule::Today,
        status: TaskStatus::Completed,
        chunk_id: chunk_id.map(String::from),
        completed_at: Some(50),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_chunk() -> Chunk {
    Chunk {
        id: "chk-0badf00d".into(),
        name: "Morning".into(),
        status: ChunkStatus::Completed,
        started_at: Some(Utc::now()),
        completed_at: Some(Utc::now()),
        total_elapsed: 1200,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

roundtrip_and_validate!(task_roundtrip, Task, sample_task(Some("chk-0badf00d")));

roundtrip_and_validate!(chunk_roundtrip, Chunk, sample_chunk());

roundtrip_and_validate!(
    chunk_with_tasks_roundtrip,
    ChunkWithTasks,
    ChunkWithTasks {
        chunk: sample_chunk(),
        tasks: vec![sample_task(Some("chk-0badf00d"))],
    }
);

roundtrip_and_validate!(
    board_roundtrip,
    Board,
    Board::build(
        vec![sample_task(None), sample_task(Some("chk-0badf00d"))],
        vec![sample_chunk()],
    )
);

roundtrip_and_validate!(
    focus_snapshot_roundtrip,
    FocusSnapshot,
    FocusSession::start(&sample_chunk(), &[sample_task(Some("chk-0badf00d"))], 1200).snapshot()
);

roundtrip_and_validate!(
    task_buckets_roundtrip,
    TaskBuckets,
    TaskBuckets::from_tasks(vec![sample_task(None)])
);

#[test]
fn task_json_uses_snake_case_fields() {
    let json = serde_json::to_value(sample_task(None)).unwrap();
    assert_eq!(json["schedule"], "today");
    assert_eq!(json["status"], "completed");
    assert!(json["chunk_id"].is_null());
    assert_eq!(json["completed_at"], 50);
}
