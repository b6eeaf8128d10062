//! Derive the node list from Pachyderm pipeline and repo listings.
//!
//! Each pipeline becomes a node whose parents are the sources its input tree
//! reads; every repo that is not a pipeline's output becomes a parentless
//! node. Accepts the JSON `pachctl list pipeline --raw` and
//! `pachctl list repo --raw` print: either an array or a stream of objects.

use std::collections::HashSet;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::model::NodeDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pipeline {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PfsInput {
    #[serde(default)]
    pub repo: String,
}

/// Named input such as `cron` or `git`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NamedInput {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub pfs: Option<PfsInput>,
    #[serde(default)]
    pub cron: Option<NamedInput>,
    #[serde(default)]
    pub git: Option<NamedInput>,
    #[serde(default)]
    pub join: Vec<Input>,
    #[serde(default)]
    pub cross: Vec<Input>,
    #[serde(default)]
    pub union: Vec<Input>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineInfo {
    pub pipeline: Pipeline,
    #[serde(default)]
    pub input: Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoInfo {
    pub repo: Pipeline,
}

fn non_empty(s: Option<&String>) -> Option<&String> {
    s.filter(|s| !s.is_empty())
}

impl Input {
    /// Source names this input reads, in tree order.
    ///
    /// The first populated branch wins: `pfs`, `cron`, `git`, then the
    /// members of `join`, `cross` or `union`.
    pub fn parents(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_parents(&mut out);
        out
    }

    fn collect_parents(&self, out: &mut Vec<String>) {
        if let Some(repo) = non_empty(self.pfs.as_ref().map(|p| &p.repo)) {
            out.push(repo.clone());
        } else if let Some(name) = non_empty(self.cron.as_ref().map(|c| &c.name)) {
            out.push(name.clone());
        } else if let Some(name) = non_empty(self.git.as_ref().map(|g| &g.name)) {
            out.push(name.clone());
        } else {
            let members = [&self.join, &self.cross, &self.union]
                .into_iter()
                .find(|m| !m.is_empty());
            for input in members.into_iter().flatten() {
                input.collect_parents(out);
            }
        }
    }
}

/// Build the node list: pipelines first, then repos that are not
/// pipeline outputs.
pub fn descriptors_from_pipelines(
    pipelines: &[PipelineInfo],
    repos: &[RepoInfo],
) -> Vec<NodeDescriptor> {
    let mut names = HashSet::new();
    let mut out = Vec::with_capacity(pipelines.len() + repos.len());
    for info in pipelines {
        names.insert(info.pipeline.name.as_str());
        out.push(NodeDescriptor {
            id: info.pipeline.name.clone(),
            parent_ids: info.input.parents(),
        });
    }
    for info in repos {
        if !names.contains(info.repo.name.as_str()) {
            out.push(NodeDescriptor::root(info.repo.name.clone()));
        }
    }
    tracing::debug!(
        pipelines = pipelines.len(),
        repos = repos.len(),
        nodes = out.len(),
        "derived pipeline graph"
    );
    out
}

/// Decode either a JSON array or a whitespace-separated stream of objects.
pub fn read_listing<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, serde_json::Error> {
    let mut out = Vec::new();
    for value in serde_json::Deserializer::from_str(body).into_iter::<serde_json::Value>() {
        match value? {
            serde_json::Value::Array(items) => {
                for item in items {
                    out.push(serde_json::from_value(item)?);
                }
            }
            other => out.push(serde_json::from_value(other)?),
        }
    }
    Ok(out)
}

/// Derive the node list straight from the two listings' JSON text.
pub fn descriptors_from_listings(
    pipelines_json: &str,
    repos_json: &str,
) -> Result<Vec<NodeDescriptor>, serde_json::Error> {
    let pipelines: Vec<PipelineInfo> = read_listing(pipelines_json)?;
    let repos: Vec<RepoInfo> = read_listing(repos_json)?;
    Ok(descriptors_from_pipelines(&pipelines, &repos))
}
