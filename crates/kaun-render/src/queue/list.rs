use std::fmt;

use crate::mesh::Mesh;
use crate::shader::Shader;
use crate::state::RenderState;
use crate::uniform::Uniform;

use super::{SortKey, SortMode};

/// One pending draw with everything captured at `draw` time.
pub struct Submission<'a> {
    mesh: &'a dyn Mesh,
    shader: &'a dyn Shader,
    state: RenderState,
    /// Built-ins first, then caller uniforms. Later entries win on name clashes.
    uniforms: Vec<Uniform>,
    depth: f32,
    instances: u32,
    key: SortKey,
}

impl<'a> Submission<'a> {
    pub fn new(
        mesh: &'a dyn Mesh,
        shader: &'a dyn Shader,
        state: RenderState,
        uniforms: Vec<Uniform>,
        depth: f32,
        instances: u32,
    ) -> Self {
        Self {
            mesh,
            shader,
            state,
            uniforms,
            depth,
            instances,
            key: SortKey::default(),
        }
    }

    #[inline]
    pub fn mesh(&self) -> &'a dyn Mesh {
        self.mesh
    }

    #[inline]
    pub fn shader(&self) -> &'a dyn Shader {
        self.shader
    }

    #[inline]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    #[inline]
    pub fn uniforms(&self) -> &[Uniform] {
        &self.uniforms
    }

    /// NDC depth of the model origin when the draw was submitted.
    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    #[inline]
    pub fn instances(&self) -> u32 {
        self.instances
    }

    /// Key from the last sorted flush; zero before that.
    #[inline]
    pub fn sort_key(&self) -> SortKey {
        self.key
    }

    fn compute_key(&mut self) {
        self.key = SortKey::new(self.state.blend_enabled, self.shader.program(), self.depth);
    }
}

impl fmt::Debug for Submission<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("program", &self.shader.program())
            .field("mesh", &self.mesh.draw_call())
            .field("state", &self.state)
            .field("uniforms", &self.uniforms.len())
            .field("depth", &self.depth)
            .field("instances", &self.instances)
            .field("key", &self.key)
            .finish()
    }
}

/// Pending submissions for the current frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - ordering reuses an internal index buffer; no per-flush allocation once warmed
#[derive(Debug, Default)]
pub struct RenderQueue<'a> {
    submissions: Vec<Submission<'a>>,
    order: Vec<usize>,
}

impl<'a> RenderQueue<'a> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, submission: Submission<'a>) {
        self.submissions.push(submission);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Submissions in the order they were pushed.
    #[inline]
    pub fn submissions(&self) -> &[Submission<'a>] {
        &self.submissions
    }

    /// Drops every pending submission. Keeps allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.submissions.clear();
        self.order.clear();
    }

    /// Iterates submissions in execution order for `mode`.
    ///
    /// The sort is stable: equal keys keep submission order.
    pub fn iter_sorted(&mut self, mode: SortMode) -> impl Iterator<Item = &Submission<'a>> {
        self.order.clear();
        self.order.extend(0..self.submissions.len());

        if mode == SortMode::Default {
            for submission in &mut self.submissions {
                submission.compute_key();
            }
            let submissions = &self.submissions;
            self.order.sort_by_key(|&i| submissions[i].key);
        }

        self.order.iter().map(|&i| &self.submissions[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ProgramId, UniformLocation};
    use crate::mesh::{MeshDraw, PrimitiveMode};

    struct Program(u32);

    impl Shader for Program {
        fn program(&self) -> ProgramId {
            ProgramId(self.0)
        }

        fn uniform_location(&self, _name: &str) -> Option<UniformLocation> {
            None
        }
    }

    fn mesh(vertex_array: u32) -> MeshDraw {
        MeshDraw {
            vertex_array,
            mode: PrimitiveMode::Triangles,
            first: 0,
            count: 3,
            indices: None,
        }
    }

    fn order(queue: &mut RenderQueue<'_>, mode: SortMode) -> Vec<u32> {
        queue.iter_sorted(mode).map(|s| s.mesh().draw_call().vertex_array).collect()
    }

    #[test]
    fn submission_mode_keeps_push_order() {
        let (a, b, c) = (mesh(1), mesh(2), mesh(3));
        let shader = Program(1);
        let blended = RenderState::default().alpha_blended();

        let mut queue = RenderQueue::new();
        queue.push(Submission::new(&a, &shader, blended, vec![], 0.1, 0));
        queue.push(Submission::new(&b, &shader, RenderState::default(), vec![], 0.9, 0));
        queue.push(Submission::new(&c, &shader, RenderState::default(), vec![], 0.5, 0));

        assert_eq!(order(&mut queue, SortMode::Submission), vec![1, 2, 3]);
        assert_eq!(queue.submissions()[0].sort_key(), SortKey::default());
    }

    #[test]
    fn default_mode_sorts_by_key() {
        let (a, b, c, d) = (mesh(1), mesh(2), mesh(3), mesh(4));
        let (s1, s2) = (Program(1), Program(2));
        let blended = RenderState::default().alpha_blended();
        let opaque = RenderState::default();

        let mut queue = RenderQueue::new();
        queue.push(Submission::new(&a, &s1, blended, vec![], 0.2, 0));
        queue.push(Submission::new(&b, &s2, opaque, vec![], 0.1, 0));
        queue.push(Submission::new(&c, &s1, opaque, vec![], 0.7, 0));
        queue.push(Submission::new(&d, &s1, blended, vec![], 0.6, 0));

        assert_eq!(order(&mut queue, SortMode::Default), vec![3, 2, 4, 1]);
        assert!(queue.submissions()[0].sort_key().is_blended());
    }

    #[test]
    fn equal_keys_keep_submission_order() {
        let (a, b, c) = (mesh(1), mesh(2), mesh(3));
        let shader = Program(7);
        let mut queue = RenderQueue::new();
        for m in [&a, &b, &c] {
            queue.push(Submission::new(m, &shader, RenderState::default(), vec![], 0.5, 0));
        }
        assert_eq!(order(&mut queue, SortMode::Default), vec![1, 2, 3]);
    }

    #[test]
    fn clear_empties_queue() {
        let a = mesh(1);
        let shader = Program(1);
        let mut queue = RenderQueue::new();
        queue.push(Submission::new(&a, &shader, RenderState::default(), vec![], 0.0, 0));
        assert_eq!(queue.len(), 1);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.iter_sorted(SortMode::Default).count(), 0);
    }
}
