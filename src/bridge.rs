//! Joint and member storage for a bridge design.

use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::analysis::AnalysisResults;
use crate::conditions::DesignConditions;
use crate::errors::BridgeEditError;
use crate::geometry::Point;
use crate::inventory::{Inventory, Material, Shape};

/// A pinned connection between members.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    /// World position in metres.
    pub position: Point,
    /// True for joints whose location is prescribed by the site.
    pub fixed: bool,
}

/// Stock and last analysis outcome of one member.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    /// Steel grade.
    material: Material,
    /// Cross-section and size.
    shape: Shape,
    /// Worst compressive force over compressive strength, once analysed.
    compression_ratio: Option<f64>,
    /// Worst tensile force over tensile strength, once analysed.
    tension_ratio: Option<f64>,
}

impl Member {
    /// Steel grade of the member.
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Cross-section of the member.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Compression force/strength ratio recorded from the last real analysis.
    #[must_use]
    pub fn compression_force_strength_ratio(&self) -> Option<f64> {
        self.compression_ratio
    }

    /// Tension force/strength ratio recorded from the last real analysis.
    #[must_use]
    pub fn tension_force_strength_ratio(&self) -> Option<f64> {
        self.tension_ratio
    }
}

/// Borrowed view of a member together with its end joints.
#[derive(Clone, Copy, Debug)]
pub struct MemberRef<'a> {
    /// Position of the member in the bridge.
    pub index: usize,
    /// Start joint.
    pub joint_a: usize,
    /// End joint.
    pub joint_b: usize,
    /// Position of the start joint.
    pub start: Point,
    /// Position of the end joint.
    pub end: Point,
    /// Member data.
    pub member: &'a Member,
}

/// Free-form information carried alongside the structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesignNotes {
    /// Name of the designer.
    pub designed_by: String,
    /// Project identifier.
    pub project_id: String,
    /// Design iteration number.
    pub iteration: u32,
}

impl Default for DesignNotes {
    fn default() -> Self {
        Self {
            designed_by: String::new(),
            project_id: String::new(),
            iteration: 1,
        }
    }
}

/// A truss bridge for one site.
///
/// Joints and members are numbered contiguously from zero in insertion order.
/// The first joints are the ones prescribed by the [`DesignConditions`].
#[derive(Clone, Debug)]
pub struct Bridge {
    /// Site the bridge is designed for.
    conditions: DesignConditions,
    /// Stock the members are drawn from.
    inventory: Inventory,
    /// Joints as nodes and members as edges.
    graph: Graph<Joint, Member>,
    /// Designer supplied notes.
    notes: DesignNotes,
}

impl Bridge {
    /// Create a bridge holding only the joints the site prescribes.
    ///
    /// # Examples
    /// ```
    /// use trussbridge::{Bridge, DesignConditions};
    ///
    /// let conditions = DesignConditions::from_key_code(1_050_800_000).expect("valid code");
    /// let bridge = Bridge::new(conditions);
    /// assert_eq!(bridge.joint_count(), 6);
    /// assert_eq!(bridge.member_count(), 0);
    /// ```
    #[must_use]
    pub fn new(conditions: DesignConditions) -> Self {
        let mut graph = Graph::new();
        for &position in conditions.prescribed_joints() {
            graph.add_node(Joint {
                position,
                fixed: true,
            });
        }
        Self {
            conditions,
            inventory: Inventory::new(),
            graph,
            notes: DesignNotes::default(),
        }
    }

    /// Site the bridge is designed for.
    #[must_use]
    pub fn conditions(&self) -> &DesignConditions {
        &self.conditions
    }

    /// Stock catalog used for members.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Designer supplied notes.
    #[must_use]
    pub fn notes(&self) -> &DesignNotes {
        &self.notes
    }

    /// Mutable access to the designer supplied notes.
    pub fn notes_mut(&mut self) -> &mut DesignNotes {
        &mut self.notes
    }

    /// Number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Joint at `index`.
    #[must_use]
    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.graph.node_weight(NodeIndex::new(index))
    }

    /// Joints in index order.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.graph.node_weights()
    }

    /// Member at `index`.
    #[must_use]
    pub fn member(&self, index: usize) -> Option<MemberRef<'_>> {
        let edge = EdgeIndex::new(index);
        let (a, b) = self.graph.edge_endpoints(edge)?;
        Some(MemberRef {
            index,
            joint_a: a.index(),
            joint_b: b.index(),
            start: self.graph[a].position,
            end: self.graph[b].position,
            member: &self.graph[edge],
        })
    }

    /// Members in index order.
    pub fn members(&self) -> impl Iterator<Item = MemberRef<'_>> {
        self.graph.edge_references().map(|edge| MemberRef {
            index: edge.id().index(),
            joint_a: edge.source().index(),
            joint_b: edge.target().index(),
            start: self.graph[edge.source()].position,
            end: self.graph[edge.target()].position,
            member: edge.weight(),
        })
    }

    /// Add a free joint and return its index.
    pub fn add_joint(&mut self, position: Point) -> usize {
        self.graph
            .add_node(Joint {
                position,
                fixed: false,
            })
            .index()
    }

    /// Move a joint that the site does not prescribe.
    ///
    /// Prescribed joints cannot be moved.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeEditError::UnknownJoint`] for a missing joint,
    /// [`BridgeEditError::PrescribedJointMismatch`] for a prescribed one and
    /// [`BridgeEditError::ZeroLengthMember`] when the move would collapse a member.
    pub fn move_joint(&mut self, index: usize, position: Point) -> Result<(), BridgeEditError> {
        let node = NodeIndex::new(index);
        let joint = self
            .graph
            .node_weight(node)
            .ok_or(BridgeEditError::UnknownJoint(index))?;
        if joint.fixed {
            return Err(BridgeEditError::PrescribedJointMismatch {
                joint: index,
                expected: joint.position,
                found: position,
            });
        }
        for neighbor in self.graph.neighbors_undirected(node) {
            if self.graph[neighbor].position == position {
                return Err(BridgeEditError::ZeroLengthMember {
                    joint_a: index,
                    joint_b: neighbor.index(),
                });
            }
        }
        self.graph[node].position = position;
        Ok(())
    }

    /// Connect two joints with a member of stock material and shape.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeEditError::UnknownJoint`] when either joint is missing,
    /// [`BridgeEditError::ZeroLengthMember`] when the joints coincide and
    /// [`BridgeEditError::Catalog`] when the stock indices are invalid.
    pub fn add_member(
        &mut self,
        joint_a: usize,
        joint_b: usize,
        material: usize,
        section: usize,
        size: usize,
    ) -> Result<usize, BridgeEditError> {
        let a = self
            .joint(joint_a)
            .ok_or(BridgeEditError::UnknownJoint(joint_a))?;
        let b = self
            .joint(joint_b)
            .ok_or(BridgeEditError::UnknownJoint(joint_b))?;
        if a.position == b.position {
            return Err(BridgeEditError::ZeroLengthMember { joint_a, joint_b });
        }
        let material = self.inventory.material(material)?.clone();
        let shape = self.inventory.shape(section, size)?;
        let edge = self.graph.add_edge(
            NodeIndex::new(joint_a),
            NodeIndex::new(joint_b),
            Member {
                material,
                shape,
                compression_ratio: None,
                tension_ratio: None,
            },
        );
        Ok(edge.index())
    }

    /// Swap the stock of an existing member, clearing its recorded ratios.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeEditError::UnknownMember`] for a missing member and
    /// [`BridgeEditError::Catalog`] when the stock indices are invalid.
    pub fn set_member_stock(
        &mut self,
        index: usize,
        material: usize,
        section: usize,
        size: usize,
    ) -> Result<(), BridgeEditError> {
        let material = self.inventory.material(material)?.clone();
        let shape = self.inventory.shape(section, size)?;
        let member = self
            .graph
            .edge_weight_mut(EdgeIndex::new(index))
            .ok_or(BridgeEditError::UnknownMember(index))?;
        *member = Member {
            material,
            shape,
            compression_ratio: None,
            tension_ratio: None,
        };
        Ok(())
    }

    /// Remove a member and return it.
    ///
    /// The member with the highest index takes over the removed index.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeEditError::UnknownMember`] for a missing member.
    pub fn remove_member(&mut self, index: usize) -> Result<Member, BridgeEditError> {
        self.graph
            .remove_edge(EdgeIndex::new(index))
            .ok_or(BridgeEditError::UnknownMember(index))
    }

    /// Straight-line length of a member in metres.
    #[must_use]
    pub fn member_length(&self, index: usize) -> Option<f64> {
        let member = self.member(index)?;
        Some(member.start.distance(member.end))
    }

    /// Length times inverse radius of gyration.
    #[must_use]
    pub fn member_slenderness(&self, index: usize) -> Option<f64> {
        let length = self.member_length(index)?;
        let member = self.member(index)?;
        Some(length * member.member.shape.inverse_radius_of_gyration)
    }

    /// True when no member exceeds the site's allowable slenderness.
    #[must_use]
    pub fn is_passing_slenderness_check(&self) -> bool {
        let allowable = self.conditions.allowable_slenderness();
        (0..self.member_count())
            .filter_map(|index| self.member_slenderness(index))
            .all(|slenderness| slenderness <= allowable)
    }

    /// Copy the worst-case force/strength ratios of a real analysis onto the members.
    ///
    /// Members beyond the range of `results` are left alone.
    pub fn record_strength_ratios(&mut self, results: &AnalysisResults) {
        let count = results.member_count().min(self.member_count());
        for index in 0..count {
            self.graph[EdgeIndex::new(index)].compression_ratio =
                Some(results.compression_ratio(index));
            self.graph[EdgeIndex::new(index)].tension_ratio = Some(results.tension_ratio(index));
        }
    }

    /// Restore ratios read from a stored design.
    pub(crate) fn set_strength_ratios(
        &mut self,
        index: usize,
        compression: Option<f64>,
        tension: Option<f64>,
    ) -> Result<(), BridgeEditError> {
        let member = self
            .graph
            .edge_weight_mut(EdgeIndex::new(index))
            .ok_or(BridgeEditError::UnknownMember(index))?;
        member.compression_ratio = compression;
        member.tension_ratio = tension;
        Ok(())
    }
}
