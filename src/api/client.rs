//! Blocking HTTP client for the entry/relationship endpoints.

use crate::graph::types::{Entity, GraphData, Relation, RelationKind};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Deserialize)]
struct GraphResponse {
    nodes: Vec<Entity>,
    links: Vec<Relation>,
}

#[derive(Debug, Serialize)]
struct NewRelationship<'a> {
    source: &'a str,
    target: &'a str,
    #[serde(rename = "type")]
    kind: RelationKind,
    weight: i32,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Check if the data service is reachable
    pub fn health(&self) -> Result<bool, String> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send() {
            Ok(resp) => {
                if resp.status().is_success() {
                    Ok(true)
                } else {
                    Err(format!("API returned status: {}", resp.status()))
                }
            }
            Err(e) => Err(format!("Failed to connect to API: {}", e)),
        }
    }

    /// Fetch the full entry/relationship graph. The relationship list is
    /// consistency-filtered here: links referencing ids absent from the
    /// node list are dropped, and weights are clamped into [1, 10], so the
    /// engine never sees a dangling reference.
    pub fn fetch_graph(&self) -> Result<GraphData, String> {
        let url = format!("{}/graph-data", self.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("API error: {}", resp.status()));
        }

        let graph_resp: GraphResponse = resp
            .json()
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(sanitize(graph_resp))
    }

    /// Create a relationship. The sole write path; triggered by confirming
    /// a node-on-node drop proposal.
    pub fn create_relationship(
        &self,
        source: &str,
        target: &str,
        kind: RelationKind,
        weight: i32,
    ) -> Result<Relation, String> {
        let url = format!("{}/relationships", self.base_url);
        let body = NewRelationship {
            source,
            target,
            kind,
            weight: weight.clamp(1, 10),
        };

        let resp = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(10))
            .json(&body)
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("API error: {}", resp.status()));
        }

        resp.json()
            .map_err(|e| format!("Failed to parse response: {}", e))
    }
}

/// Boundary repair: drop dangling links, clamp weights.
fn sanitize(resp: GraphResponse) -> GraphData {
    let known: HashSet<&str> = resp.nodes.iter().map(|n| n.id.as_str()).collect();

    let total = resp.links.len();
    let relations: Vec<Relation> = resp
        .links
        .into_iter()
        .filter(|l| known.contains(l.source.as_str()) && known.contains(l.target.as_str()))
        .map(|mut l| {
            l.weight = l.weight.clamp(1, 10);
            l
        })
        .collect();

    let dropped = total - relations.len();
    if dropped > 0 {
        tracing::warn!(dropped, "discarded relationships with unknown endpoints");
    }
    tracing::info!(
        nodes = resp.nodes.len(),
        links = relations.len(),
        "fetched graph data"
    );

    GraphData {
        entries: resp.nodes,
        relations,
    }
}
