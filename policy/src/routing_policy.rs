// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-neutral routing policies: named, callable lists of statements

use serde::{Deserialize, Serialize};

use crate::statement::Statement;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    pub name: String,
    pub statements: Vec<Statement>,
}

impl RoutingPolicy {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            statements: vec![],
        }
    }
    #[must_use]
    pub fn with_statements(name: &str, statements: Vec<Statement>) -> Self {
        Self {
            name: name.to_owned(),
            statements,
        }
    }
    #[must_use]
    pub fn add_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }
    /// A policy that accepts everything
    #[must_use]
    pub fn accept_all(name: &str) -> Self {
        Self::with_statements(name, vec![Statement::ExitAccept])
    }
    /// A policy that denies everything, whether called or evaluated on its own
    #[must_use]
    pub fn deny_all(name: &str) -> Self {
        Self::with_statements(name, vec![Statement::deny_in_context()])
    }
    /// Names of all policies called by this one
    #[must_use]
    pub fn called_policies(&self) -> Vec<&str> {
        let mut out = vec![];
        self.statements
            .iter()
            .for_each(|s| s.called_policies(&mut out));
        out.sort_unstable();
        out.dedup();
        out
    }
}
