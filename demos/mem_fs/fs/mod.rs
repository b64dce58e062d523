//! In-memory filesystem used by the demo binary and the integration
//! tests.
//!
//! A tree of directories and byte-vector files behind one mutex. File
//! contents live behind their own shared buffer so every open stream on
//! a path observes the same bytes, including streams reopened after the
//! driver's cleanup phase.

use std::collections::BTreeMap;
use std::io::SeekFrom;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use dokan_vfs::path;
use dokan_vfs::vfs::{
    FsError, FsResult, OpenMode, ResourceInfo, Vfs, VfsFile, S_IFDIR, S_IFREG,
};

#[derive(Debug, Copy, Clone)]
struct Stamps {
    created: SystemTime,
    accessed: SystemTime,
    modified: SystemTime,
}

impl Stamps {
    fn now() -> Self {
        let t = SystemTime::now();
        Self { created: t, accessed: t, modified: t }
    }
}

#[derive(Debug)]
struct FileNode {
    data: Arc<Mutex<Vec<u8>>>,
    stamps: Stamps,
}

impl FileNode {
    fn empty() -> Self {
        Self { data: Arc::new(Mutex::new(Vec::new())), stamps: Stamps::now() }
    }
}

#[derive(Debug)]
struct DirNode {
    children: BTreeMap<String, Node>,
    stamps: Stamps,
}

impl DirNode {
    fn empty() -> Self {
        Self { children: BTreeMap::new(), stamps: Stamps::now() }
    }
}

#[derive(Debug)]
enum Node {
    Dir(DirNode),
    File(FileNode),
}

impl Node {
    fn info(&self) -> ResourceInfo {
        match self {
            Node::Dir(dir) => ResourceInfo {
                st_mode: S_IFDIR | 0o755,
                created: Some(dir.stamps.created),
                accessed: Some(dir.stamps.accessed),
                modified: Some(dir.stamps.modified),
                size: 0,
            },
            Node::File(file) => ResourceInfo {
                st_mode: S_IFREG | 0o644,
                created: Some(file.stamps.created),
                accessed: Some(file.stamps.accessed),
                modified: Some(file.stamps.modified),
                size: file.data.lock().expect("file buffer poisoned").len() as u64,
            },
        }
    }
}

/// The in-memory volume.
#[derive(Debug)]
pub struct MemFs {
    root: Mutex<Node>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    pub fn new() -> Self {
        Self { root: Mutex::new(Node::Dir(DirNode::empty())) }
    }

    /// Create an empty file; existing files are left alone.
    pub fn create(&self, path: &str) -> FsResult<()> {
        let comps = path::components(path);
        let Some((name, parents)) = comps.split_last() else {
            return Err(FsError::Invalid);
        };
        let mut root = self.lock();
        let parent = walk_dir_mut(&mut root, parents)?;
        match parent.children.get(name) {
            Some(Node::File(_)) => Ok(()),
            Some(Node::Dir(_)) => Err(FsError::Invalid),
            None => {
                parent.children.insert(name.clone(), Node::File(FileNode::empty()));
                Ok(())
            }
        }
    }

    /// Append UTF-8 text, creating the file as needed.
    pub fn append_text(&self, path: &str, text: &str) -> FsResult<()> {
        self.create(path)?;
        let mut file = self.open(path, OpenMode::ReadWrite)?;
        file.seek(SeekFrom::End(0))?;
        file.write(text.as_bytes())?;
        file.close()
    }

    fn lock(&self) -> MutexGuard<'_, Node> {
        self.root.lock().expect("filesystem tree poisoned")
    }
}

fn walk<'a>(mut node: &'a Node, comps: &[String]) -> FsResult<&'a Node> {
    for comp in comps {
        match node {
            Node::Dir(dir) => node = dir.children.get(comp).ok_or(FsError::NotFound)?,
            Node::File(_) => return Err(FsError::NotFound),
        }
    }
    Ok(node)
}

fn walk_mut<'a>(mut node: &'a mut Node, comps: &[String]) -> FsResult<&'a mut Node> {
    for comp in comps {
        match node {
            Node::Dir(dir) => node = dir.children.get_mut(comp).ok_or(FsError::NotFound)?,
            Node::File(_) => return Err(FsError::NotFound),
        }
    }
    Ok(node)
}

fn walk_dir_mut<'a>(node: &'a mut Node, comps: &[String]) -> FsResult<&'a mut DirNode> {
    match walk_mut(node, comps)? {
        Node::Dir(dir) => Ok(dir),
        Node::File(_) => Err(FsError::Invalid),
    }
}

impl Vfs for MemFs {
    fn exists(&self, path: &str) -> bool {
        walk(&self.lock(), &path::components(path)).is_ok()
    }

    fn isdir(&self, path: &str) -> bool {
        matches!(walk(&self.lock(), &path::components(path)), Ok(Node::Dir(_)))
    }

    fn isfile(&self, path: &str) -> bool {
        matches!(walk(&self.lock(), &path::components(path)), Ok(Node::File(_)))
    }

    fn make_dir(&self, path: &str) -> FsResult<bool> {
        let comps = path::components(path);
        let Some((name, parents)) = comps.split_last() else {
            return Err(FsError::AlreadyExists);
        };
        let mut root = self.lock();
        let parent = walk_dir_mut(&mut root, parents)?;
        if parent.children.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        parent.children.insert(name.clone(), Node::Dir(DirNode::empty()));
        Ok(true)
    }

    fn open(&self, path: &str, mode: OpenMode) -> FsResult<Box<dyn VfsFile>> {
        let comps = path::components(path);
        let Some((name, parents)) = comps.split_last() else {
            return Err(FsError::Invalid);
        };
        let mut root = self.lock();
        let parent = walk_dir_mut(&mut root, parents)?;
        let data = match parent.children.get_mut(name) {
            Some(Node::File(file)) => {
                if mode == OpenMode::Truncate {
                    file.data.lock().expect("file buffer poisoned").clear();
                    file.stamps.modified = SystemTime::now();
                }
                file.data.clone()
            }
            Some(Node::Dir(_)) => return Err(FsError::Invalid),
            None => {
                if mode == OpenMode::ReadWrite {
                    return Err(FsError::NotFound);
                }
                let node = FileNode::empty();
                let data = node.data.clone();
                parent.children.insert(name.clone(), Node::File(node));
                data
            }
        };
        Ok(Box::new(MemFile { data, pos: 0, mode, closed: false }))
    }

    fn listdir(&self, path: &str) -> FsResult<Vec<String>> {
        let root = self.lock();
        match walk(&root, &path::components(path))? {
            Node::Dir(dir) => Ok(dir.children.keys().cloned().collect()),
            Node::File(_) => Err(FsError::Invalid),
        }
    }

    fn listdirinfo(&self, path: &str) -> FsResult<Vec<(String, ResourceInfo)>> {
        let root = self.lock();
        match walk(&root, &path::components(path))? {
            Node::Dir(dir) => {
                Ok(dir.children.iter().map(|(name, node)| (name.clone(), node.info())).collect())
            }
            Node::File(_) => Err(FsError::Invalid),
        }
    }

    fn getinfo(&self, path: &str) -> FsResult<ResourceInfo> {
        Ok(walk(&self.lock(), &path::components(path))?.info())
    }

    fn settimes(
        &self,
        path: &str,
        accessed: Option<SystemTime>,
        modified: Option<SystemTime>,
    ) -> FsResult<()> {
        let mut root = self.lock();
        let node = walk_mut(&mut root, &path::components(path))?;
        let stamps = match node {
            Node::Dir(dir) => &mut dir.stamps,
            Node::File(file) => &mut file.stamps,
        };
        if let Some(t) = accessed {
            stamps.accessed = t;
        }
        if let Some(t) = modified {
            stamps.modified = t;
        }
        Ok(())
    }

    fn remove(&self, path: &str) -> FsResult<()> {
        let comps = path::components(path);
        let Some((name, parents)) = comps.split_last() else {
            return Err(FsError::Invalid);
        };
        let mut root = self.lock();
        let parent = walk_dir_mut(&mut root, parents)?;
        match parent.children.get(name) {
            Some(Node::File(_)) => {
                parent.children.remove(name);
                Ok(())
            }
            Some(Node::Dir(_)) => Err(FsError::Invalid),
            None => Err(FsError::NotFound),
        }
    }

    fn remove_dir(&self, path: &str) -> FsResult<()> {
        let comps = path::components(path);
        let Some((name, parents)) = comps.split_last() else {
            return Err(FsError::Invalid);
        };
        let mut root = self.lock();
        let parent = walk_dir_mut(&mut root, parents)?;
        match parent.children.get(name) {
            Some(Node::Dir(dir)) if !dir.children.is_empty() => Err(FsError::NotEmpty),
            Some(Node::Dir(_)) => {
                parent.children.remove(name);
                Ok(())
            }
            Some(Node::File(_)) => Err(FsError::Invalid),
            None => Err(FsError::NotFound),
        }
    }

    fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> FsResult<()> {
        let src_comps = path::components(src);
        let dst_comps = path::components(dst);
        let Some((src_name, src_parents)) = src_comps.split_last() else {
            return Err(FsError::Invalid);
        };
        let Some((dst_name, dst_parents)) = dst_comps.split_last() else {
            return Err(FsError::Invalid);
        };
        let mut root = self.lock();
        {
            let parent = walk_dir_mut(&mut root, src_parents)?;
            match parent.children.get(src_name) {
                Some(Node::File(_)) => {}
                Some(Node::Dir(_)) => return Err(FsError::Invalid),
                None => return Err(FsError::NotFound),
            }
        }
        {
            let parent = walk_dir_mut(&mut root, dst_parents)?;
            match parent.children.get(dst_name) {
                Some(Node::Dir(_)) => return Err(FsError::Invalid),
                Some(Node::File(_)) if !overwrite => return Err(FsError::AlreadyExists),
                _ => {}
            }
        }
        let node = walk_dir_mut(&mut root, src_parents)?
            .children
            .remove(src_name)
            .ok_or(FsError::NotFound)?;
        walk_dir_mut(&mut root, dst_parents)?.children.insert(dst_name.clone(), node);
        Ok(())
    }

    fn move_dir(&self, src: &str, dst: &str, create: bool) -> FsResult<()> {
        let src_comps = path::components(src);
        let dst_comps = path::components(dst);
        if src_comps.is_empty() {
            return Err(FsError::Invalid);
        }
        // A directory cannot move into its own subtree.
        if dst_comps.len() > src_comps.len() && dst_comps[..src_comps.len()] == src_comps[..] {
            return Err(FsError::Invalid);
        }
        let (src_name, src_parents) = src_comps.split_last().expect("checked non-empty");
        let Some((dst_name, dst_parents)) = dst_comps.split_last() else {
            return Err(FsError::Invalid);
        };
        let mut root = self.lock();
        {
            let parent = walk_dir_mut(&mut root, src_parents)?;
            match parent.children.get(src_name) {
                Some(Node::Dir(_)) => {}
                Some(Node::File(_)) => return Err(FsError::Invalid),
                None => return Err(FsError::NotFound),
            }
        }
        {
            let parent = walk_dir_mut(&mut root, dst_parents)?;
            match parent.children.get(dst_name) {
                Some(Node::File(_)) => return Err(FsError::AlreadyExists),
                Some(Node::Dir(dir)) if !dir.children.is_empty() => return Err(FsError::NotEmpty),
                Some(Node::Dir(_)) => {}
                None if !create => return Err(FsError::NotFound),
                None => {}
            }
        }
        let node = walk_dir_mut(&mut root, src_parents)?
            .children
            .remove(src_name)
            .ok_or(FsError::NotFound)?;
        walk_dir_mut(&mut root, dst_parents)?.children.insert(dst_name.clone(), node);
        Ok(())
    }
}

/// Stream over a shared file buffer.
#[derive(Debug)]
struct MemFile {
    data: Arc<Mutex<Vec<u8>>>,
    pos: u64,
    mode: OpenMode,
    closed: bool,
}

impl VfsFile for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> FsResult<usize> {
        if self.closed {
            return Err(FsError::Invalid);
        }
        let data = self.data.lock().expect("file buffer poisoned");
        let start = (self.pos as usize).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }

    fn write(&mut self, src: &[u8]) -> FsResult<usize> {
        if self.closed {
            return Err(FsError::Invalid);
        }
        let mut data = self.data.lock().expect("file buffer poisoned");
        let pos = self.pos as usize;
        let end = pos + src.len();
        if end > data.len() {
            data.resize(end, 0);
        }
        data[pos..end].copy_from_slice(src);
        self.pos = end as u64;
        Ok(src.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> FsResult<u64> {
        if self.closed {
            return Err(FsError::Invalid);
        }
        let len = self.data.lock().expect("file buffer poisoned").len() as i64;
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::End(delta) => len + delta,
            SeekFrom::Current(delta) => self.pos as i64 + delta,
        };
        if target < 0 {
            return Err(FsError::Invalid);
        }
        self.pos = target as u64;
        Ok(self.pos)
    }

    fn tell(&self) -> u64 {
        self.pos
    }

    fn truncate(&mut self) -> FsResult<()> {
        if self.closed {
            return Err(FsError::Invalid);
        }
        let mut data = self.data.lock().expect("file buffer poisoned");
        data.resize(self.pos as usize, 0);
        Ok(())
    }

    fn flush(&mut self) -> FsResult<()> {
        if self.closed {
            return Err(FsError::Invalid);
        }
        Ok(())
    }

    fn close(&mut self) -> FsResult<()> {
        self.closed = true;
        Ok(())
    }

    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn closed(&self) -> bool {
        self.closed
    }
}
