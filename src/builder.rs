//! Tree builder service.
//!
//! Owns the node tree, the component registry, the generator and an output
//! sink. Every mutation re-renders the whole tree and persists the app module.
//! The in-memory tree is updated before the write is issued, so a failed write
//! is reported to the caller but never rolls the tree back.

use crate::codegen::MarkupGenerator;
use crate::config::BuilderConfig;
use crate::error::{BuilderError, BuilderResult};
use crate::node::{ComponentDefinition, Node, NodeUpdate, Tree, FRAGMENT_TAG, ROOT_ID};
use crate::registry::ComponentRegistry;
use crate::sink::{FsSink, OutputSink};

/// Maps a JS-style insertion index to `move_node`'s position: negative
/// values (conventionally `-1`) mean append.
pub fn position_from_index(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}

pub struct BuilderService {
    tree: Tree,
    registry: ComponentRegistry,
    generator: MarkupGenerator,
    config: BuilderConfig,
    sink: Box<dyn OutputSink>,
}

impl BuilderService {
    pub fn new(config: BuilderConfig, sink: Box<dyn OutputSink>) -> Self {
        BuilderService {
            tree: Tree::new(),
            registry: ComponentRegistry::new(),
            generator: MarkupGenerator::new(config.generator.clone()),
            config,
            sink,
        }
    }

    /// Builder persisting to the filesystem paths named in `config`.
    pub fn with_fs(config: BuilderConfig) -> Self {
        Self::new(config, Box::new(FsSink))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn generator(&self) -> &MarkupGenerator {
        &self.generator
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn regenerate(&mut self) -> BuilderResult<()> {
        let code = self.generator.render_tree(&self.tree)?;
        let path = self.config.app_path();
        self.sink.write(&path, &code)?;
        log::info!("generated app component written to {}", path.display());
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // TREE OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    /// Discards the current tree and starts over from a bare root.
    pub fn init_tree(&mut self) -> BuilderResult<&Tree> {
        self.tree = Tree::new();
        self.regenerate()?;
        Ok(&self.tree)
    }

    pub fn find_node_by_id(&self, id: &str) -> Option<&Node> {
        self.tree.find(id)
    }

    /// Appends `node` under `parent_id` (the root when `None`) and returns its id.
    /// Component templates are not expanded here; that happens at generation time.
    pub fn add_node(&mut self, mut node: Node, parent_id: Option<&str>) -> BuilderResult<String> {
        let parent_id = parent_id.unwrap_or(ROOT_ID);
        let id = match &node.id {
            Some(id) => id.clone(),
            None => {
                let id = self.registry.new_id();
                node.id = Some(id.clone());
                id
            }
        };

        let parent = self
            .tree
            .find_mut(parent_id)
            .ok_or_else(|| BuilderError::not_found(parent_id))?;
        parent.children.push(node);
        log::debug!("added node {} under {}", id, parent_id);

        self.regenerate()?;
        Ok(id)
    }

    /// Unlinks the node from its parent. Removing an unknown id is a no-op
    /// that returns `false` and skips regeneration.
    pub fn remove_node(&mut self, id: &str) -> BuilderResult<bool> {
        if self.tree.root.detach(id).is_none() {
            return Ok(false);
        }
        log::debug!("removed node {}", id);
        self.regenerate()?;
        Ok(true)
    }

    /// Shallow overwrite of the fields present in `updates`.
    /// The root stays a fragment: a type change to anything else is rejected
    /// before the tree is touched.
    pub fn update_node(&mut self, id: &str, updates: NodeUpdate) -> BuilderResult<&Node> {
        if id == ROOT_ID {
            if let Some(tag) = updates.node_type.as_deref() {
                if tag != FRAGMENT_TAG {
                    return Err(BuilderError::OperationFailed(format!(
                        "Root node must stay a {}, got {}",
                        FRAGMENT_TAG, tag
                    )));
                }
            }
        }

        let node = self
            .tree
            .find_mut(id)
            .ok_or_else(|| BuilderError::not_found(id))?;
        updates.apply_to(node);
        log::debug!("updated node {}", id);

        self.regenerate()?;
        self.tree.find(id).ok_or_else(|| BuilderError::not_found(id))
    }

    /// Moves a node (with its subtree) under `new_parent_id`, inserting at
    /// `position` or appending when the position is absent or out of range.
    pub fn move_node(
        &mut self,
        id: &str,
        new_parent_id: &str,
        position: Option<usize>,
    ) -> BuilderResult<String> {
        let node = self.tree.find(id).ok_or_else(|| BuilderError::not_found(id))?;
        if self.tree.find(new_parent_id).is_none() {
            return Err(BuilderError::not_found(new_parent_id));
        }
        if node.find(new_parent_id).is_some() {
            return Err(BuilderError::OperationFailed(format!(
                "Cannot move node with ID {} into its own subtree",
                id
            )));
        }

        let moved = self.tree.root.detach(id).ok_or_else(|| {
            BuilderError::OperationFailed(format!("Failed to remove node with ID {}", id))
        })?;

        let parent = self
            .tree
            .find_mut(new_parent_id)
            .ok_or_else(|| BuilderError::not_found(new_parent_id))?;
        match position {
            Some(index) if index < parent.children.len() => parent.children.insert(index, moved),
            _ => parent.children.push(moved),
        }
        log::debug!("moved node {} under {}", id, new_parent_id);

        self.regenerate()?;
        Ok(id.to_string())
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // REGISTRY OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    /// Registers (or replaces) a custom component and writes its module to the
    /// user components directory. The registration key becomes the
    /// definition's `nodeType`.
    pub fn register_component(
        &mut self,
        node_type: &str,
        mut definition: ComponentDefinition,
    ) -> BuilderResult<()> {
        if definition.node_type != node_type {
            definition.node_type = node_type.to_string();
        }
        let code = self.generator.render_definition(&definition)?;
        self.registry.register(node_type, definition);

        let path = self.config.user_component_path(node_type);
        self.sink.write(&path, &code)?;
        log::info!("custom component written to {}", path.display());
        Ok(())
    }

    pub fn available_components(&self) -> Vec<String> {
        self.registry.list_types()
    }

    pub fn component_definition(&self, node_type: &str) -> Option<&ComponentDefinition> {
        self.registry.get(node_type)
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // INTERCHANGE
    // ═══════════════════════════════════════════════════════════════════════════════

    pub fn serialize_tree(&self) -> BuilderResult<String> {
        self.tree.to_json()
    }

    /// Replaces the tree with a deserialized one. Does not regenerate.
    pub fn load_tree(&mut self, text: &str) -> BuilderResult<&Tree> {
        self.tree = Tree::from_json(text)?;
        Ok(&self.tree)
    }
}
