use super::types::PipelineInstance;

/// Node of the folder view: folders group pipelines by their folder path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderNode<'a> {
    Folder {
        name: String,
        children: Vec<FolderNode<'a>>,
    },
    Pipeline(&'a PipelineInstance),
}

impl FolderNode<'_> {
    #[cfg(test)]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder { name, .. } => name,
            Self::Pipeline(pipeline) => &pipeline.name,
        }
    }
}

/// Splits a backslash-delimited folder path (`\apps\web`) into its segments.
///
/// The root (`\`), an empty path and a missing folder yield no segments.
pub fn folder_segments(folder: Option<&str>) -> Vec<&str> {
    folder
        .map(|folder| {
            folder
                .split('\\')
                .filter(|segment| !segment.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Arranges pipelines into a folder tree.
///
/// Folders and pipelines keep the order in which they are first encountered.
pub fn build_folder_tree(pipelines: &[PipelineInstance]) -> Vec<FolderNode<'_>> {
    let mut roots = Vec::new();
    for pipeline in pipelines {
        insert(&mut roots, &folder_segments(pipeline.folder()), pipeline);
    }
    roots
}

fn insert<'a>(nodes: &mut Vec<FolderNode<'a>>, path: &[&str], pipeline: &'a PipelineInstance) {
    let Some((first, rest)) = path.split_first() else {
        nodes.push(FolderNode::Pipeline(pipeline));
        return;
    };

    let position = nodes
        .iter()
        .position(|node| matches!(node, FolderNode::Folder { name, .. } if name == first));

    let index = position.unwrap_or_else(|| {
        nodes.push(FolderNode::Folder {
            name: (*first).to_string(),
            children: Vec::new(),
        });
        nodes.len() - 1
    });

    if let FolderNode::Folder { children, .. } = &mut nodes[index] {
        insert(children, rest, pipeline);
    }
}

/// Visits the tree depth first, yielding each node with its depth.
pub fn flatten<'t, 'a>(nodes: &'t [FolderNode<'a>]) -> Vec<(usize, &'t FolderNode<'a>)> {
    fn walk<'t, 'a>(
        nodes: &'t [FolderNode<'a>],
        depth: usize,
        out: &mut Vec<(usize, &'t FolderNode<'a>)>,
    ) {
        for node in nodes {
            out.push((depth, node));
            if let FolderNode::Folder { children, .. } = node {
                walk(children, depth + 1, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}
