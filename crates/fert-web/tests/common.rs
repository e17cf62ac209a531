#![allow(dead_code)]

use chrono::{DateTime, Utc};
use fert_core::TokenRecord;
use fert_source::{Snapshot, SnapshotSource};

pub fn reference_token() -> TokenRecord {
    TokenRecord {
        id: 6_000_000,
        supply: 1,
        humidity: 5.0,
        start_progress: 0,
        end_progress: 6_000_000,
        season: 6074,
    }
}

pub fn token(id: u64, start: u64, season: u32) -> TokenRecord {
    TokenRecord {
        id,
        supply: 1,
        humidity: 2.5,
        start_progress: start,
        end_progress: id,
        season,
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp")
}

pub fn snapshot_source(progress: u64, tokens: Vec<TokenRecord>) -> SnapshotSource {
    SnapshotSource::new(Snapshot { progress, tokens })
}
