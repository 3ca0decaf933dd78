//! The resource tree: the ordered folder structure shown by the editor.
//!
//! # Layout
//!
//! ```text
//! u32 root_count
//! node := u32 status
//!         u32 group
//!         i32 index        (-1 unless status is Secondary)
//!         string label
//!         u32 child_count
//!         child_count × node
//! ```
//!
//! Child order is the persisted order and is never sorted.

use serde::{Deserialize, Serialize};

use super::{
	GmkError,
	resource::{Handle, ReferenceTable, Resource, ResourceKind, ResourceRef},
	stream::Stream,
};

/// Deepest nesting accepted when decoding
pub const MAX_DEPTH: usize = 256;

/// status + group + index + label length + child count
const MIN_NODE_SIZE: usize = 20;

/// Role of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum NodeStatus {
	/// Top-level category root
	Primary = 1,
	/// User folder
	Group = 2,
	/// Leaf bound to one resource
	Secondary = 3,
}

impl NodeStatus {
	/// Converts a u32 value to `NodeStatus`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			1 => Some(Self::Primary),
			2 => Some(Self::Group),
			3 => Some(Self::Secondary),
			_ => None,
		}
	}
}

/// Category a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum GroupKind {
	/// Objects
	Objects = 1,
	/// Sprites
	Sprites = 2,
	/// Sounds
	Sounds = 3,
	/// Rooms
	Rooms = 4,
	/// Backgrounds
	Backgrounds = 6,
	/// Scripts
	Scripts = 7,
	/// Paths
	Paths = 8,
	/// Fonts (called data files by the oldest editors)
	Fonts = 9,
	/// Game information
	GameInformation = 10,
	/// Global game settings
	GameOptions = 11,
	/// Timelines
	Timelines = 12,
	/// Extension packages
	ExtensionPackages = 13,
}

impl GroupKind {
	/// Category roots in the order the editor creates them
	pub const CANONICAL: [GroupKind; 12] = [
		Self::Sprites,
		Self::Sounds,
		Self::Backgrounds,
		Self::Paths,
		Self::Scripts,
		Self::Fonts,
		Self::Timelines,
		Self::Objects,
		Self::Rooms,
		Self::GameInformation,
		Self::GameOptions,
		Self::ExtensionPackages,
	];

	/// Converts a u32 value to `GroupKind`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			1 => Some(Self::Objects),
			2 => Some(Self::Sprites),
			3 => Some(Self::Sounds),
			4 => Some(Self::Rooms),
			6 => Some(Self::Backgrounds),
			7 => Some(Self::Scripts),
			8 => Some(Self::Paths),
			9 => Some(Self::Fonts),
			10 => Some(Self::GameInformation),
			11 => Some(Self::GameOptions),
			12 => Some(Self::Timelines),
			13 => Some(Self::ExtensionPackages),
			_ => None,
		}
	}

	/// Kind of the resources listed under this category, if it lists any
	pub fn resource_kind(self) -> Option<ResourceKind> {
		match self {
			Self::Objects => Some(ResourceKind::Object),
			Self::Sprites => Some(ResourceKind::Sprite),
			Self::Sounds => Some(ResourceKind::Sound),
			Self::Rooms => Some(ResourceKind::Room),
			Self::Backgrounds => Some(ResourceKind::Background),
			Self::Scripts => Some(ResourceKind::Script),
			Self::Paths => Some(ResourceKind::Path),
			Self::Fonts => Some(ResourceKind::Font),
			Self::Timelines => Some(ResourceKind::Timeline),
			Self::GameInformation | Self::GameOptions | Self::ExtensionPackages => None,
		}
	}

	/// Label of the category root
	pub fn label(self) -> &'static str {
		match self {
			Self::Objects => "Objects",
			Self::Sprites => "Sprites",
			Self::Sounds => "Sounds",
			Self::Rooms => "Rooms",
			Self::Backgrounds => "Backgrounds",
			Self::Scripts => "Scripts",
			Self::Paths => "Paths",
			Self::Fonts => "Fonts",
			Self::GameInformation => "Game Information",
			Self::GameOptions => "Global Game Settings",
			Self::Timelines => "Time Lines",
			Self::ExtensionPackages => "Extension Packages",
		}
	}

	fn canonical_rank(self) -> usize {
		Self::CANONICAL.iter().position(|&g| g == self).unwrap_or(Self::CANONICAL.len())
	}
}

impl std::fmt::Display for GroupKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// A node of the resource tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
	/// Role of the node
	pub status: NodeStatus,
	/// Category the node belongs to
	pub group: GroupKind,
	/// Display label
	pub label: String,
	/// Bound resource; [`ResourceRef::Empty`] unless `status` is Secondary
	pub resource: ResourceRef,
	/// Children, in persisted order
	pub children: Vec<TreeNode>,
}

impl TreeNode {
	/// Creates a category root
	pub fn root(group: GroupKind) -> Self {
		Self {
			status: NodeStatus::Primary,
			group,
			label: group.label().to_string(),
			resource: ResourceRef::Empty,
			children: Vec::new(),
		}
	}

	/// Appends a folder inheriting this node's category and returns it
	pub fn add_filter(&mut self, label: impl Into<String>) -> &mut TreeNode {
		self.children.push(Self {
			status: NodeStatus::Group,
			group: self.group,
			label: label.into(),
			resource: ResourceRef::Empty,
			children: Vec::new(),
		});
		let last = self.children.len() - 1;
		&mut self.children[last]
	}

	/// Appends a leaf bound to `resource` and returns it.
	///
	/// Returns `None`, leaving the node untouched, if the resource's kind does
	/// not belong to this node's category.
	pub fn add_resource<T: Resource>(&mut self, resource: &T) -> Option<&mut TreeNode> {
		if self.group.resource_kind() != Some(T::KIND) {
			return None;
		}
		self.children.push(Self {
			status: NodeStatus::Secondary,
			group: self.group,
			label: resource.name().to_string(),
			resource: ResourceRef::from(Handle::new(T::KIND, resource.id())),
			children: Vec::new(),
		});
		self.children.last_mut()
	}

	/// Total number of nodes in this subtree, this one included
	pub fn node_count(&self) -> usize {
		1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
	}

	/// Visits this node and its descendants depth-first, with their depth
	pub fn walk<'a>(&'a self, depth: usize, f: &mut dyn FnMut(&'a TreeNode, usize)) {
		f(self, depth);
		for child in &self.children {
			child.walk(depth + 1, f);
		}
	}

	fn for_each_node_mut(&mut self, f: &mut dyn FnMut(&mut TreeNode)) {
		f(self);
		for child in &mut self.children {
			child.for_each_node_mut(f);
		}
	}

	fn write(&self, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.status as u32);
		stream.write_u32(self.group as u32);
		self.resource.write(stream);
		stream.write_string(&self.label)?;
		stream.write_u32(self.children.len() as u32);
		self.children.iter().try_for_each(|child| child.write(stream))
	}

	fn read(stream: &mut Stream, depth: usize) -> Result<Self, GmkError> {
		let offset = stream.offset();
		if depth > MAX_DEPTH {
			return Err(malformed(offset, format!("nesting deeper than {MAX_DEPTH}")));
		}

		let value = stream.read_u32()?;
		let status =
			NodeStatus::from_u32(value).ok_or_else(|| malformed(offset, format!("unknown node status {value}")))?;
		let value = stream.read_u32()?;
		let group =
			GroupKind::from_u32(value).ok_or_else(|| malformed(offset + 4, format!("unknown group {value}")))?;
		let index = stream.read_i32()?;
		let label = stream.read_string()?;

		let resource = match status {
			NodeStatus::Secondary => {
				let kind = group.resource_kind().ok_or_else(|| {
					malformed(offset, format!("leaf '{label}' under {group}, which holds no resources"))
				})?;
				if index < 0 {
					return Err(malformed(offset + 8, format!("leaf '{label}' has no resource index")));
				}
				ResourceRef::raw(kind, index)
			}
			NodeStatus::Primary | NodeStatus::Group => ResourceRef::Empty,
		};

		let children = read_nodes(stream, depth + 1)?;
		Ok(Self {
			status,
			group,
			label,
			resource,
			children,
		})
	}
}

fn malformed(offset: usize, reason: String) -> GmkError {
	GmkError::MalformedTree {
		offset,
		reason,
	}
}

fn read_nodes(stream: &mut Stream, depth: usize) -> Result<Vec<TreeNode>, GmkError> {
	let offset = stream.offset();
	let count = stream.read_u32()? as usize;
	if count.saturating_mul(MIN_NODE_SIZE) > stream.remaining() {
		return Err(malformed(
			offset,
			format!("{count} nodes cannot fit in the remaining {} bytes", stream.remaining()),
		));
	}
	(0..count).map(|_| TreeNode::read(stream, depth)).collect()
}

/// The resource tree of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTree {
	roots: Vec<TreeNode>,
}

impl Default for ResourceTree {
	fn default() -> Self {
		Self::new()
	}
}

impl ResourceTree {
	/// Creates a tree holding every category root in canonical order
	pub fn new() -> Self {
		Self {
			roots: GroupKind::CANONICAL.iter().map(|&group| TreeNode::root(group)).collect(),
		}
	}

	/// Creates a tree from explicit roots
	pub fn from_roots(roots: Vec<TreeNode>) -> Self {
		Self {
			roots,
		}
	}

	/// Top-level nodes, in persisted order
	pub fn roots(&self) -> &[TreeNode] {
		&self.roots
	}

	/// Top-level nodes, mutably
	pub fn roots_mut(&mut self) -> &mut Vec<TreeNode> {
		&mut self.roots
	}

	/// Returns the category root for `group`, creating it if absent.
	///
	/// A created root is inserted after every existing root that precedes it
	/// in canonical order.
	pub fn get_branch(&mut self, group: GroupKind) -> &mut TreeNode {
		let found = self.roots.iter().position(|n| n.status == NodeStatus::Primary && n.group == group);
		let index = match found {
			Some(index) => index,
			None => {
				let rank = group.canonical_rank();
				let at = self
					.roots
					.iter()
					.rposition(|n| n.group.canonical_rank() < rank)
					.map_or(0, |i| i + 1);
				self.roots.insert(at, TreeNode::root(group));
				at
			}
		};
		&mut self.roots[index]
	}

	/// Appends a leaf for `resource` to its category root.
	///
	/// Returns `None` for kinds that are not listed in the tree.
	pub fn add_resource<T: Resource>(&mut self, resource: &T) -> Option<&mut TreeNode> {
		let group = T::KIND.group()?;
		self.get_branch(group).add_resource(resource)
	}

	/// Total number of nodes
	pub fn node_count(&self) -> usize {
		self.roots.iter().map(TreeNode::node_count).sum()
	}

	/// Visits every node depth-first, with its depth (roots are depth 0)
	pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a TreeNode, usize)) {
		for root in &self.roots {
			root.walk(0, f);
		}
	}

	/// Visits every bound resource reference
	pub fn for_each_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		for root in &mut self.roots {
			root.for_each_node_mut(&mut |node| f(&mut node.resource));
		}
	}

	/// Writes the tree block
	pub fn encode(&self, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.roots.len() as u32);
		self.roots.iter().try_for_each(|root| root.write(stream))
	}

	/// Reads a whole tree block; trailing bytes are rejected
	pub fn decode(stream: &mut Stream) -> Result<Self, GmkError> {
		let roots = read_nodes(stream, 0)?;
		if !stream.at_end() {
			return Err(malformed(
				stream.offset(),
				format!("{} trailing bytes after the last root", stream.remaining()),
			));
		}
		Ok(Self {
			roots,
		})
	}

	/// Resolves every leaf against the table
	pub fn finalize(&mut self, table: &ReferenceTable) -> Result<(), GmkError> {
		let mut dangling = None;
		for root in &mut self.roots {
			root.for_each_node_mut(&mut |node| {
				if dangling.is_some() {
					return;
				}
				if let Err(raw) = node.resource.resolve(table) {
					dangling = Some(GmkError::DanglingTreeNode {
						label: node.label.clone(),
						to: raw.kind,
						index: raw.index,
					});
				}
			});
		}
		dangling.map_or(Ok(()), Err)
	}

	/// Checks that every leaf names a live resource of its category, leaving
	/// the leaves untouched.
	///
	/// A leaf whose reference is empty, or points at another kind, fails like a
	/// leaf pointing at a missing slot, since it could not be read back.
	pub fn verify(&self, table: &ReferenceTable) -> Result<(), GmkError> {
		let mut failure = None;
		self.walk(&mut |node, _| {
			if failure.is_some() || node.status != NodeStatus::Secondary {
				return;
			}
			let Some(kind) = node.group.resource_kind() else {
				let reason = format!("leaf '{}' under {}, which holds no resources", node.label, node.group);
				failure = Some(malformed(0, reason));
				return;
			};
			let index = node.resource.stored_index();
			let valid = match node.resource {
				ResourceRef::Empty => false,
				ResourceRef::Raw(raw) => raw.kind == kind && node.resource.check(table).is_ok(),
				ResourceRef::Resolved(handle) => handle.kind() == kind && node.resource.check(table).is_ok(),
			};
			if !valid {
				failure = Some(GmkError::DanglingTreeNode {
					label: node.label.clone(),
					to: kind,
					index,
				});
			}
		});
		failure.map_or(Ok(()), Err)
	}

	/// Drops leaves bound to a removed slot and shifts the indices after it
	pub fn remove_resource(&mut self, kind: ResourceKind, index: usize) {
		fn prune(nodes: &mut Vec<TreeNode>, kind: ResourceKind, index: usize) {
			nodes.retain_mut(|node| {
				if node.status == NodeStatus::Secondary {
					node.resource.shift_after_removal(kind, index);
					if node.resource == ResourceRef::Empty {
						return false;
					}
				}
				prune(&mut node.children, kind, index);
				true
			});
		}
		prune(&mut self.roots, kind, index);
	}
}
