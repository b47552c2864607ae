//! Adjacency-list graphs stored as visualization assignments.

use serde::{Deserialize, Serialize};

use super::{Decoder, ensure, fail, lenient_string, parse_json};
use crate::Result;

const DECODER: &str = "graph";

/// A vertex, identified by its position in the stored node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vertex {
    pub id: usize,
    /// Node label, empty when the stored node had none.
    pub name: String,
}

/// A directed, weighted, labelled edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub label: String,
    pub weight: i32,
}

/// Directed graph with integer vertex ids and string data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex(&self, id: usize) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Edges leaving `id`, in stored order.
    pub fn outgoing(&self, id: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.source == id)
    }
}

#[derive(Deserialize)]
struct GraphAssignment {
    #[serde(rename = "assignmentJSON")]
    assignment_json: GraphAssignmentBody,
}

#[derive(Deserialize)]
struct GraphAssignmentBody {
    data: Vec<GraphData>,
}

#[derive(Deserialize)]
struct GraphData {
    visual: String,
    nodes: Vec<NodeJson>,
    links: Vec<LinkJson>,
}

#[derive(Deserialize)]
struct NodeJson {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
}

#[derive(Deserialize)]
struct LinkJson {
    #[serde(default, deserialize_with = "lenient_string")]
    label: Option<String>,
    source: usize,
    target: usize,
    weight: i32,
}

/// Decodes `assignmentJSON.data[0]` of a `GraphAdjacencyList` assignment.
///
/// Node names and link labels are optional; link `source`, `target` and
/// `weight` must be integers and endpoints must name existing nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphDecoder;

impl Decoder for GraphDecoder {
    type Output = Graph;

    fn name(&self) -> &'static str {
        DECODER
    }

    fn decode(&self, body: &str) -> Result<Graph> {
        let assignment: GraphAssignment = parse_json(body, DECODER)?;
        let data = assignment
            .assignment_json
            .data
            .into_iter()
            .next()
            .ok_or_else(|| fail(DECODER, "no data"))?;
        ensure(
            data.visual == "GraphAdjacencyList",
            DECODER,
            "not a GraphAdjacencyList",
        )?;

        let vertices: Vec<Vertex> = data
            .nodes
            .into_iter()
            .enumerate()
            .map(|(id, node)| Vertex {
                id,
                name: node.name.unwrap_or_default(),
            })
            .collect();

        let mut edges = Vec::with_capacity(data.links.len());
        for link in data.links {
            ensure(
                link.source < vertices.len() && link.target < vertices.len(),
                DECODER,
                &format!("link {} -> {} names a missing node", link.source, link.target),
            )?;
            edges.push(Edge {
                source: link.source,
                target: link.target,
                label: link.label.unwrap_or_default(),
                weight: link.weight,
            });
        }

        Ok(Graph { vertices, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(visual: &str, nodes: &str, links: &str) -> String {
        format!(
            r#"{{"assignmentJSON":{{"data":[{{"visual":"{visual}","nodes":{nodes},"links":{links}}}]}}}}"#
        )
    }

    #[test]
    fn decodes_vertices_and_edges() {
        let body = assignment(
            "GraphAdjacencyList",
            r#"[{"name":"a"},{"name":"b"},{"color":"red"}]"#,
            r#"[{"source":0,"target":1,"label":"ab","weight":3},{"source":1,"target":2,"weight":1}]"#,
        );
        let graph = GraphDecoder.decode(&body).unwrap();
        assert_eq!(graph.vertices().len(), 3);
        assert_eq!(graph.vertex(0).unwrap().name, "a");
        assert_eq!(graph.vertex(2).unwrap().name, "");
        assert_eq!(
            graph.edges()[0],
            Edge {
                source: 0,
                target: 1,
                label: "ab".into(),
                weight: 3
            }
        );
        assert_eq!(graph.edges()[1].label, "");
        assert_eq!(graph.outgoing(1).count(), 1);
    }

    #[test]
    fn non_string_name_is_ignored() {
        let body = assignment("GraphAdjacencyList", r#"[{"name":5}]"#, "[]");
        let graph = GraphDecoder.decode(&body).unwrap();
        assert_eq!(graph.vertex(0).unwrap().name, "");
    }

    #[test]
    fn wrong_visual_rejected() {
        let body = assignment("Array", "[]", "[]");
        let err = GraphDecoder.decode(&body).unwrap_err();
        assert!(err.to_string().contains("not a GraphAdjacencyList"));
    }

    #[test]
    fn missing_weight_rejected() {
        let body = assignment(
            "GraphAdjacencyList",
            r#"[{"name":"a"},{"name":"b"}]"#,
            r#"[{"source":0,"target":1}]"#,
        );
        assert!(GraphDecoder.decode(&body).unwrap_err().is_malformed());
    }

    #[test]
    fn non_integer_endpoint_rejected() {
        let body = assignment(
            "GraphAdjacencyList",
            r#"[{"name":"a"}]"#,
            r#"[{"source":"0","target":0,"weight":1}]"#,
        );
        assert!(GraphDecoder.decode(&body).unwrap_err().is_malformed());
    }

    #[test]
    fn dangling_endpoint_rejected() {
        let body = assignment(
            "GraphAdjacencyList",
            r#"[{"name":"a"}]"#,
            r#"[{"source":0,"target":4,"weight":1}]"#,
        );
        assert!(GraphDecoder.decode(&body).unwrap_err().is_malformed());
    }

    #[test]
    fn missing_data_rejected() {
        assert!(GraphDecoder.decode(r#"{"assignmentJSON":{}}"#).is_err());
        assert!(GraphDecoder.decode(r#"{"assignmentJSON":{"data":[]}}"#).is_err());
        assert!(GraphDecoder.decode("not json").is_err());
    }
}
