// src/batch/return_codes.rs

//! Ordered record of the exit codes of one batch run.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnCodeStack {
    codes: Vec<i32>,
}

impl ReturnCodeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: i32) {
        self.codes.push(code);
    }

    pub fn all(&self) -> &[i32] {
        &self.codes
    }

    pub fn last(&self) -> Option<i32> {
        self.codes.last().copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// True when every recorded code is zero (vacuously true when empty).
    pub fn all_successful(&self) -> bool {
        self.codes.iter().all(|&c| c == 0)
    }

    pub fn any_errored(&self) -> bool {
        self.codes.iter().any(|&c| c != 0)
    }
}
