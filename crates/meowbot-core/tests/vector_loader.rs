//! JSON test vector loader shared by the decode tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub frame: Value,
    #[serde(default)]
    pub expect: Option<Expect>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct Expect {
    pub tag: String,
    pub envelope: Value,
    pub payload: Value,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

impl TestVector {
    pub fn frame_object(&self) -> Map<String, Value> {
        match &self.frame {
            Value::Object(m) => m.clone(),
            other => panic!("vector frame must be an object, got {other}"),
        }
    }
}

pub fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

/// Every vector file in `tests/vectors`, sorted.
pub fn all() -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir("tests/vectors")
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".json"))
        .collect();
    names.sort();
    names
}
