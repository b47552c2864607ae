//! Rebuilding data structures from assignments stored on the server.

use super::DataSource;
use crate::Result;
use crate::decode::{ColorGrid, ColorGridDecoder, Decoder, Graph, GraphDecoder};

/// URL of a stored assignment: `<server>/assignmentJSON/<assignment>.<sub:02>/<user>`.
pub fn assignment_url(server: &str, user: &str, assignment: u32, subassignment: u32) -> String {
    format!(
        "{}/assignmentJSON/{assignment}.{subassignment:02}/{user}",
        server.trim_end_matches('/')
    )
}

impl DataSource {
    /// Fetch and decode an assignment. Assignments change between runs,
    /// so they are never cached.
    async fn assignment<D: Decoder>(
        &self,
        user: &str,
        assignment: u32,
        subassignment: u32,
        decoder: &D,
    ) -> Result<D::Output> {
        let url = assignment_url(&self.assignment_server_url, user, assignment, subassignment);
        let body = self.fetch_uncached(&url, &[]).await?;
        decoder.decode(&body)
    }

    /// Reconstruct the color grid a user uploaded as `assignment.subassignment`.
    pub async fn color_grid_from_assignment(
        &self,
        user: &str,
        assignment: u32,
        subassignment: u32,
    ) -> Result<ColorGrid> {
        self.assignment(user, assignment, subassignment, &ColorGridDecoder)
            .await
    }

    /// Reconstruct the adjacency-list graph a user uploaded as
    /// `assignment.subassignment`.
    pub async fn graph_from_assignment(
        &self,
        user: &str,
        assignment: u32,
        subassignment: u32,
    ) -> Result<Graph> {
        self.assignment(user, assignment, subassignment, &GraphDecoder)
            .await
    }
}
