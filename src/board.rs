//! Project-board client: resolves the configured board, locates the issue's
//! item on it, and writes the board's single-select Priority field.
//!
//! GitHub exposes Projects v2 as a graph (organization → project → fields /
//! items → issue), so a leaf field write takes several chained lookups. The
//! chain lives here so the orchestrator can treat it as one coarse operation
//! with a single combined failure mode.

use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::GitHubClient;
use crate::error::Error;

/// Name of the board field that mirrors triage priority.
const PRIORITY_FIELD: &str = "Priority";

/// Owner namespace of a Projects v2 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOwner {
    Organization,
    User,
}

/// Parsed form of a board URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLink {
    /// Whether the board lives under an organization or a user
    pub owner_type: BoardOwner,
    /// Owner login
    pub owner: String,
    /// Board number within the owner namespace
    pub number: u64,
}

impl BoardLink {
    /// Parse a board URL of the form
    /// `https://github.com/{orgs|users}/{owner}/projects/{number}`.
    pub fn parse(url: &str) -> Result<Self, Error> {
        let re = Regex::new(r"/(orgs|users)/([^/]+)/projects/(\d+)/?$").unwrap();
        let caps = re
            .captures(url.trim())
            .ok_or_else(|| Error::InvalidBoardLink(url.to_string()))?;
        let owner_type = if &caps[1] == "orgs" {
            BoardOwner::Organization
        } else {
            BoardOwner::User
        };
        let number = caps[3]
            .parse()
            .map_err(|_| Error::InvalidBoardLink(url.to_string()))?;
        Ok(Self {
            owner_type,
            owner: caps[2].to_string(),
            number,
        })
    }
}

/// The board's Priority single-select field.
#[derive(Debug, Clone)]
pub struct PriorityField {
    /// Field node id
    pub field_id: String,
    /// Option name → option id, from the board's current schema
    pub options: HashMap<String, String>,
}

/// Identity and field schema of a resolved board.
///
/// Fetched fresh per triage run and never cached: option ids can change
/// between runs.
#[derive(Debug, Clone)]
pub struct ProjectBoardInfo {
    /// Project node id
    pub project_id: String,
    /// The Priority field, when the board has one
    pub priority_field: Option<PriorityField>,
}

/// An issue's item on some board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    /// Item node id (the mutation target)
    pub item_id: String,
    /// Node id of the board the item belongs to
    pub project_id: String,
}

/// An issue's item on the configured board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItemLink {
    /// Item node id
    pub item_id: String,
}

/// Client for the board read-modify-write chain.
pub struct BoardClient {
    gh: GitHubClient,
}

impl BoardClient {
    /// Create a client over the given API client (project-scoped token).
    #[must_use]
    pub fn new(gh: GitHubClient) -> Self {
        Self { gh }
    }

    /// Resolve the board behind `link`: its project node id plus the
    /// Priority field's id and option map. A board without a Priority field
    /// resolves with `priority_field: None`; the field write is then skipped
    /// rather than failed.
    pub async fn resolve_board(&self, link: &BoardLink) -> Result<ProjectBoardInfo, Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct OwnerData {
            project_v2: Option<Project>,
        }

        #[derive(Deserialize)]
        struct Project {
            id: String,
            fields: FieldConnection,
        }

        #[derive(Deserialize)]
        struct FieldConnection {
            nodes: Vec<FieldNode>,
        }

        /// Non-single-select fields come back as empty objects from the
        /// inline fragment, hence every field is optional.
        #[derive(Deserialize)]
        struct FieldNode {
            id: Option<String>,
            name: Option<String>,
            options: Option<Vec<FieldOption>>,
        }

        #[derive(Deserialize)]
        struct FieldOption {
            id: String,
            name: String,
        }

        const ORG_QUERY: &str = r"
            query OrgBoardSchema($owner: String!, $number: Int!) {
                organization(login: $owner) {
                    projectV2(number: $number) {
                        id
                        fields(first: 50) {
                            nodes {
                                ... on ProjectV2SingleSelectField {
                                    id
                                    name
                                    options { id name }
                                }
                            }
                        }
                    }
                }
            }
        ";

        const USER_QUERY: &str = r"
            query UserBoardSchema($owner: String!, $number: Int!) {
                user(login: $owner) {
                    projectV2(number: $number) {
                        id
                        fields(first: 50) {
                            nodes {
                                ... on ProjectV2SingleSelectField {
                                    id
                                    name
                                    options { id name }
                                }
                            }
                        }
                    }
                }
            }
        ";

        let (query, root) = match link.owner_type {
            BoardOwner::Organization => (ORG_QUERY, "organization"),
            BoardOwner::User => (USER_QUERY, "user"),
        };

        let data = self
            .gh
            .graphql(query, json!({ "owner": link.owner, "number": link.number }))
            .await?;
        let owner: Option<OwnerData> =
            serde_json::from_value(data.get(root).cloned().unwrap_or(Value::Null))?;
        let project = owner.and_then(|o| o.project_v2).ok_or_else(|| {
            Error::RemoteLookup(format!(
                "board {}/{} not found or not visible to the project token",
                link.owner, link.number
            ))
        })?;

        let priority_field = project.fields.nodes.into_iter().find_map(|field| {
            match (field.id, field.name, field.options) {
                (Some(id), Some(name), Some(options)) if name == PRIORITY_FIELD => {
                    Some(PriorityField {
                        field_id: id,
                        options: options.into_iter().map(|o| (o.name, o.id)).collect(),
                    })
                }
                _ => None,
            }
        });
        if priority_field.is_none() {
            debug!(
                owner = %link.owner,
                number = link.number,
                "Board has no Priority field; field sync will be skipped"
            );
        }

        Ok(ProjectBoardInfo {
            project_id: project.id,
            priority_field,
        })
    }

    /// All board items the issue is tracked on.
    ///
    /// Field mutations target an item node layered under the issue's own
    /// node; this indirection is a property of the remote schema and has to
    /// be walked explicitly.
    pub async fn project_items(&self, issue_node_id: &str) -> Result<Vec<ProjectItem>, Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct IssueNode {
            project_items: Option<ItemConnection>,
        }

        #[derive(Deserialize)]
        struct ItemConnection {
            nodes: Vec<ItemNode>,
        }

        #[derive(Deserialize)]
        struct ItemNode {
            id: String,
            project: ProjectRef,
        }

        #[derive(Deserialize)]
        struct ProjectRef {
            id: String,
        }

        const QUERY: &str = r"
            query IssueProjectItems($id: ID!) {
                node(id: $id) {
                    ... on Issue {
                        projectItems(first: 50) {
                            nodes {
                                id
                                project { id }
                            }
                        }
                    }
                }
            }
        ";

        let data = self.gh.graphql(QUERY, json!({ "id": issue_node_id })).await?;
        let node: Option<IssueNode> =
            serde_json::from_value(data.get("node").cloned().unwrap_or(Value::Null))?;

        Ok(node
            .and_then(|n| n.project_items)
            .map(|items| {
                items
                    .nodes
                    .into_iter()
                    .map(|item| ProjectItem {
                        item_id: item.id,
                        project_id: item.project.id,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// The issue's item on the given board, if the issue is tracked there.
    ///
    /// Absence is a valid terminal state: the issue simply has not been
    /// added to the board, and no field update is attempted.
    pub async fn find_board_item(
        &self,
        issue_node_id: &str,
        project_id: &str,
    ) -> Result<Option<BoardItemLink>, Error> {
        let items = self.project_items(issue_node_id).await?;
        Ok(items
            .into_iter()
            .find(|item| item.project_id == project_id)
            .map(|item| BoardItemLink {
                item_id: item.item_id,
            }))
    }

    /// Set the board's Priority field on `item_id` to `option_id`.
    ///
    /// Setting the same option repeatedly is a no-op on the board, so the
    /// write is safe to reissue on every event.
    pub async fn set_priority(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<(), Error> {
        const MUTATION: &str = r"
            mutation SetPriority($project: ID!, $item: ID!, $field: ID!, $option: String!) {
                updateProjectV2ItemFieldValue(
                    input: {
                        projectId: $project
                        itemId: $item
                        fieldId: $field
                        value: { singleSelectOptionId: $option }
                    }
                ) {
                    projectV2Item { id }
                }
            }
        ";

        let data = self
            .gh
            .graphql(
                MUTATION,
                json!({
                    "project": project_id,
                    "item": item_id,
                    "field": field_id,
                    "option": option_id,
                }),
            )
            .await?;

        if data
            .pointer("/updateProjectV2ItemFieldValue/projectV2Item/id")
            .and_then(Value::as_str)
            .is_none()
        {
            return Err(Error::RemoteLookup(
                "field update returned no project item".to_string(),
            ));
        }
        info!(item = item_id, option = option_id, "Updated board priority field");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_org_board_url_with_trailing_slash() {
        let link = BoardLink::parse("https://github.com/orgs/acme/projects/11/").unwrap();
        assert_eq!(link.owner_type, BoardOwner::Organization);
        assert_eq!(link.owner, "acme");
        assert_eq!(link.number, 11);
    }

    #[test]
    fn parses_user_board_url() {
        let link = BoardLink::parse("https://github.com/users/octocat/projects/3").unwrap();
        assert_eq!(link.owner_type, BoardOwner::User);
        assert_eq!(link.owner, "octocat");
        assert_eq!(link.number, 3);
    }

    #[test]
    fn rejects_urls_without_a_project_number() {
        for url in [
            "https://github.com/orgs/acme/projects/",
            "https://github.com/acme/widgets",
            "https://github.com/orgs/acme",
            "not a url",
        ] {
            assert!(
                matches!(BoardLink::parse(url), Err(Error::InvalidBoardLink(_))),
                "expected InvalidBoardLink for {url}"
            );
        }
    }
}
