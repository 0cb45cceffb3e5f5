//! Summary: In-memory virtual filesystem over the dictionary facade.
//! Copyright (c) YOAB. All rights reserved.
//!
//! The filesystem is two dictionary specialisations working together: a
//! B+Tree dictionary from node id to node, and per-directory B-Tree
//! dictionaries from child name to node id. Directory listings therefore
//! come out in name order for free.
//!
//! Files are virtual names attached to physical paths on the host
//! filesystem; `touch` allocates a scratch file in the service directory
//! and attaches it. A name with an extension denotes a file, a bare name a
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dict::{BPlusDictionary, BTreeDictionary};
use crate::error::{Error, Result};
use crate::path::VfsPath;

/// Identifier of a virtual node.
pub type VnodeId = u64;

/// A directory: a named dictionary of children.
pub struct DirNode {
    id: VnodeId,
    parent: Option<VnodeId>,
    name: String,
    contents: BTreeDictionary<String, VnodeId>,
}

/// A file: a virtual name backed by a physical path.
pub struct FileNode {
    id: VnodeId,
    parent: Option<VnodeId>,
    name: String,
    disk_path: PathBuf,
}

/// A node in the virtual tree.
pub enum VfsNode {
    Dir(DirNode),
    File(FileNode),
}

impl VfsNode {
    /// Returns the node id.
    pub fn id(&self) -> VnodeId {
        match self {
            VfsNode::Dir(dir) => dir.id,
            VfsNode::File(file) => file.id,
        }
    }

    /// Returns the parent id; `None` for the root.
    pub fn parent(&self) -> Option<VnodeId> {
        match self {
            VfsNode::Dir(dir) => dir.parent,
            VfsNode::File(file) => file.parent,
        }
    }

    /// Returns the node name.
    pub fn name(&self) -> &str {
        match self {
            VfsNode::Dir(dir) => &dir.name,
            VfsNode::File(file) => &file.name,
        }
    }

    /// Returns true for directories.
    pub fn is_dir(&self) -> bool {
        matches!(self, VfsNode::Dir(_))
    }

    fn set_parent(&mut self, parent: Option<VnodeId>) {
        match self {
            VfsNode::Dir(dir) => dir.parent = parent,
            VfsNode::File(file) => file.parent = parent,
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            VfsNode::Dir(dir) => dir.name = name,
            VfsNode::File(file) => file.name = name,
        }
    }
}

/// Result of [`Vfs::open`].
#[derive(Debug, PartialEq, Eq)]
pub enum Opened {
    /// The path named a directory; the working directory moved there.
    Directory,
    /// The path named a file; this is its backing physical path.
    File(PathBuf),
}

/// The virtual filesystem shell.
pub struct Vfs {
    nodes: BPlusDictionary<VnodeId, VfsNode>,
    root: VnodeId,
    cwd: VnodeId,
    next_id: VnodeId,
    scratch_dir: PathBuf,
    scratch_count: u64,
}

impl Vfs {
    /// Creates a filesystem with a single root directory. Scratch files for
    /// `touch` are allocated under `scratch_dir`, which is created if
    /// missing.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Result<Self> {
        let scratch_dir = scratch_dir.into();
        fs::create_dir_all(&scratch_dir)?;
        // Anchor the service directory so scratch files attach with
        // absolute physical paths regardless of the host's working
        // directory.
        let scratch_dir = scratch_dir.canonicalize()?;

        let root_id: VnodeId = 1;
        let mut nodes = BPlusDictionary::new();
        nodes
            .add(
                root_id,
                VfsNode::Dir(DirNode {
                    id: root_id,
                    parent: None,
                    name: "/".to_string(),
                    contents: BTreeDictionary::new(),
                }),
            )
            .map_err(|_| Error::InvalidInput {
                reason: "fresh node table rejected the root".to_string(),
            })?;

        Ok(Self {
            nodes,
            root: root_id,
            cwd: root_id,
            next_id: root_id + 1,
            scratch_dir,
            scratch_count: 0,
        })
    }

    /// Returns the number of registered nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Changes the working directory.
    pub fn cd(&mut self, path: &str) -> Result<()> {
        let id = self.resolve_str(path)?;
        if !self.node(id).is_dir() {
            return Err(Error::NotADirectory {
                name: self.node(id).name().to_string(),
            });
        }
        self.cwd = id;
        Ok(())
    }

    /// Returns the absolute path of the working directory.
    pub fn pwd(&self) -> String {
        let mut segments = Vec::new();
        let mut id = self.cwd;
        while let Some(parent) = self.node(id).parent() {
            segments.push(self.node(id).name().to_string());
            id = parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Lists the working directory's children in name order.
    pub fn ls(&self) -> Vec<String> {
        match self.node(self.cwd) {
            VfsNode::Dir(dir) => dir.contents.keys().cloned().collect(),
            VfsNode::File(_) => Vec::new(),
        }
    }

    /// Creates a directory at `path`.
    pub fn mkdir(&mut self, path: &str) -> Result<()> {
        let vpath = VfsPath::parse(path);
        let name = match vpath.file_name() {
            Some(name) => name.to_string(),
            None => {
                return Err(Error::InvalidInput {
                    reason: "mkdir needs a directory name".to_string(),
                })
            }
        };

        let location = self.resolve(&vpath.location())?;
        self.require_dir(location)?;
        if self.dir(location)?.contents.contains(&name) {
            return Err(Error::AlreadyExists {
                path: vpath.to_string(),
            });
        }

        let id = self.fresh_id();
        self.register(
            location,
            name.clone(),
            VfsNode::Dir(DirNode {
                id,
                parent: Some(location),
                name,
                contents: BTreeDictionary::new(),
            }),
        )
    }

    /// Creates a file at `path`, backed by a fresh scratch file in the
    /// service directory.
    pub fn touch(&mut self, path: &str) -> Result<()> {
        let vpath = VfsPath::parse(path);
        if self.exists(&vpath) {
            return Err(Error::AlreadyExists {
                path: vpath.to_string(),
            });
        }

        let phys = self.scratch_dir.join(format!("scratch-{}", self.scratch_count));
        self.scratch_count += 1;
        fs::File::create(&phys).map_err(|source| Error::FileCreate {
            path: phys.clone(),
            source,
        })?;

        self.attach(path, &phys)
    }

    /// Attaches an existing physical file under a virtual path. The
    /// physical path must be absolute (relative paths depend on the host
    /// process and are rejected); the virtual name must carry an extension.
    pub fn attach(&mut self, virt: &str, phys: impl AsRef<Path>) -> Result<()> {
        let phys = phys.as_ref();
        if !phys.is_absolute() {
            return Err(Error::RelativePhysicalPath {
                path: phys.to_path_buf(),
            });
        }
        let phys = phys.to_path_buf();
        if !phys.is_file() {
            return Err(Error::NotAFile {
                name: phys.display().to_string(),
            });
        }

        let vpath = VfsPath::parse(virt);
        if vpath.name().is_empty() || vpath.extension().is_empty() {
            return Err(Error::InvalidInput {
                reason: "a virtual file needs both a name and an extension".to_string(),
            });
        }

        let location = self.resolve(&vpath.location())?;
        self.require_dir(location)?;
        let name = vpath
            .file_name()
            .map(str::to_string)
            .unwrap_or_default();
        if self.dir(location)?.contents.contains(&name) {
            return Err(Error::AlreadyExists {
                path: vpath.to_string(),
            });
        }

        let id = self.fresh_id();
        self.register(
            location,
            name.clone(),
            VfsNode::File(FileNode {
                id,
                parent: Some(location),
                name,
                disk_path: phys,
            }),
        )
    }

    /// Removes the directory at `path` together with everything below it.
    pub fn rmdir(&mut self, path: &str) -> Result<()> {
        let id = self.resolve_str(path)?;
        let node = self.node(id);
        if !node.is_dir() {
            return Err(Error::NotADirectory {
                name: node.name().to_string(),
            });
        }
        let Some(parent) = node.parent() else {
            return Err(Error::RootOperation { op: "rmdir" });
        };

        let doomed = self.collect_subtree(id);
        let name = self.node(id).name().to_string();
        self.dir_mut(parent)?.contents.remove(&name);
        for victim in doomed {
            self.nodes.remove(&victim);
        }
        Ok(())
    }

    /// Removes the file at `path`.
    pub fn rm(&mut self, path: &str) -> Result<()> {
        let id = self.resolve_str(path)?;
        let node = self.node(id);
        if node.is_dir() {
            return Err(Error::NotAFile {
                name: node.name().to_string(),
            });
        }
        let parent = node
            .parent()
            .expect("files always hang off a directory");

        let name = node.name().to_string();
        self.dir_mut(parent)?.contents.remove(&name);
        self.nodes.remove(&id);
        Ok(())
    }

    /// Moves `from` to `to`. An existing directory destination receives the
    /// node under its own name; a non-existing destination renames into its
    /// parent. Moving the root, moving a directory into itself or a
    /// descendant, and overwriting an existing name are rejected.
    pub fn mv(&mut self, from: &str, to: &str) -> Result<()> {
        let src = self.resolve_str(from)?;
        if self.node(src).parent().is_none() {
            return Err(Error::RootOperation { op: "mv" });
        }

        let dest_path = VfsPath::parse(to);
        match self.resolve(&dest_path) {
            Ok(dest) => {
                // Move under an existing directory, keeping the name.
                if !self.node(dest).is_dir() {
                    return Err(Error::NotADirectory {
                        name: self.node(dest).name().to_string(),
                    });
                }
                if dest == src || self.is_ancestor(src, dest) {
                    return Err(Error::CyclicMove);
                }
                let name = self.node(src).name().to_string();
                if self.dir(dest)?.contents.contains(&name) {
                    return Err(Error::AlreadyExists {
                        path: dest_path.to_string(),
                    });
                }
                self.relink(src, dest, name)
            }
            Err(Error::NoSuchPath { .. }) => {
                // Rename into the destination's parent directory.
                let new_name = match dest_path.file_name() {
                    Some(name) => name.to_string(),
                    None => {
                        return Err(Error::InvalidInput {
                            reason: "mv needs a destination name".to_string(),
                        })
                    }
                };
                let dest = self.resolve(&dest_path.location())?;
                self.require_dir(dest)?;
                if dest == src || self.is_ancestor(src, dest) {
                    return Err(Error::CyclicMove);
                }
                if self.dir(dest)?.contents.contains(&new_name) {
                    return Err(Error::AlreadyExists {
                        path: dest_path.to_string(),
                    });
                }
                self.relink(src, dest, new_name)
            }
            Err(err) => Err(err),
        }
    }

    /// Opens `path`: a directory becomes the working directory, a file
    /// reports its backing physical path.
    pub fn open(&mut self, path: &str) -> Result<Opened> {
        let id = self.resolve_str(path)?;
        match self.node(id) {
            VfsNode::Dir(_) => {
                self.cwd = id;
                Ok(Opened::Directory)
            }
            VfsNode::File(file) => Ok(Opened::File(file.disk_path.clone())),
        }
    }

    // ==================== Resolution ====================

    fn resolve_str(&self, path: &str) -> Result<VnodeId> {
        self.resolve(&VfsPath::parse(path))
    }

    fn resolve(&self, path: &VfsPath) -> Result<VnodeId> {
        let mut id = if path.is_absolute() { self.root } else { self.cwd };

        for segment in path.segments() {
            if segment == ".." {
                if let Some(parent) = self.node(id).parent() {
                    id = parent;
                }
                continue;
            }
            match self.node(id) {
                VfsNode::Dir(dir) => match dir.contents.get(&segment.to_string()) {
                    Ok(&child) => id = child,
                    Err(_) => {
                        return Err(Error::NoSuchPath {
                            path: path.to_string(),
                        })
                    }
                },
                VfsNode::File(file) => {
                    return Err(Error::NotADirectory {
                        name: file.name.clone(),
                    })
                }
            }
        }
        Ok(id)
    }

    fn exists(&self, path: &VfsPath) -> bool {
        self.resolve(path).is_ok()
    }

    fn node(&self, id: VnodeId) -> &VfsNode {
        self.nodes.get(&id).expect("dangling node id")
    }

    fn node_mut(&mut self, id: VnodeId) -> &mut VfsNode {
        self.nodes.get_mut(&id).expect("dangling node id")
    }

    fn dir(&self, id: VnodeId) -> Result<&DirNode> {
        match self.node(id) {
            VfsNode::Dir(dir) => Ok(dir),
            VfsNode::File(file) => Err(Error::NotADirectory {
                name: file.name.clone(),
            }),
        }
    }

    fn dir_mut(&mut self, id: VnodeId) -> Result<&mut DirNode> {
        match self.node_mut(id) {
            VfsNode::Dir(dir) => Ok(dir),
            VfsNode::File(file) => Err(Error::NotADirectory {
                name: file.name.clone(),
            }),
        }
    }

    fn require_dir(&self, id: VnodeId) -> Result<()> {
        self.dir(id).map(|_| ())
    }

    fn is_ancestor(&self, ancestor: VnodeId, mut id: VnodeId) -> bool {
        while let Some(parent) = self.node(id).parent() {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    fn fresh_id(&mut self) -> VnodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn register(&mut self, parent: VnodeId, name: String, node: VfsNode) -> Result<()> {
        let id = node.id();
        self.dir_mut(parent)?.contents.add(name, id)?;
        self.nodes.add(id, node).map_err(|_| Error::InvalidInput {
            reason: "node id already registered".to_string(),
        })
    }

    fn relink(&mut self, src: VnodeId, new_parent: VnodeId, new_name: String) -> Result<()> {
        let old_parent = self
            .node(src)
            .parent()
            .expect("relink never touches the root");
        let old_name = self.node(src).name().to_string();

        self.dir_mut(old_parent)?.contents.remove(&old_name);
        self.dir_mut(new_parent)?.contents.add(new_name.clone(), src)?;
        let node = self.node_mut(src);
        node.set_parent(Some(new_parent));
        node.set_name(new_name);
        Ok(())
    }

    fn collect_subtree(&self, id: VnodeId) -> Vec<VnodeId> {
        let mut doomed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            doomed.push(current);
            if let VfsNode::Dir(dir) = self.node(current) {
                stack.extend(dir.contents.entries().map(|(_, &child)| child));
            }
        }
        doomed
    }
}
