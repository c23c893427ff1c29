//! Workgroup dispatch for per-ball passes
//!
//! Every pass is a kernel `(index, snapshot) -> record`. The dispatcher runs
//! one unit per ball, grouped into workgroups on the rayon pool, reading the
//! front buffer and writing only slot `index` of the back buffer. Swapping the
//! buffers once every unit has finished is the barrier between passes.

use rayon::prelude::*;

use super::ball::GpuBall;

/// Front/back buffers of the compute mirror
#[derive(Debug, Clone, Default)]
pub struct PassBuffers {
    front: Vec<GpuBall>,
    back: Vec<GpuBall>,
}

impl PassBuffers {
    pub fn new(records: Vec<GpuBall>) -> Self {
        let back = records.clone();
        Self {
            front: records,
            back,
        }
    }

    /// Committed output of the last pass
    #[inline]
    pub fn current(&self) -> &[GpuBall] {
        &self.front
    }

    pub fn len(&self) -> usize {
        self.front.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    /// Replace both buffers with new contents
    pub fn upload(&mut self, records: &[GpuBall]) {
        self.front.clear();
        self.front.extend_from_slice(records);
        self.back.clear();
        self.back.extend_from_slice(records);
    }

    /// Raw bytes of the committed buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.front)
    }
}

/// Launches kernels over a [`PassBuffers`] in fixed-size workgroups
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    workgroup_size: usize,
}

impl Dispatcher {
    /// `workgroup_size` must be non-zero (settings validation enforces this)
    pub fn new(workgroup_size: usize) -> Self {
        Self {
            workgroup_size: workgroup_size.max(1),
        }
    }

    pub fn workgroup_size(&self) -> usize {
        self.workgroup_size
    }

    /// Number of workgroups needed to cover `len` units
    #[inline]
    pub fn workgroups_for(&self, len: usize) -> usize {
        len.div_ceil(self.workgroup_size)
    }

    /// Run `kernel` once per record and commit the results.
    ///
    /// The last workgroup may be partially filled; units past the end of the
    /// population return without touching anything.
    pub fn launch<K>(&self, buffers: &mut PassBuffers, kernel: K)
    where
        K: Fn(usize, &[GpuBall]) -> GpuBall + Sync,
    {
        let count = buffers.front.len();
        if count == 0 {
            return;
        }
        let group_size = self.workgroup_size;
        let snapshot = buffers.front.as_slice();

        buffers
            .back
            .par_chunks_mut(group_size)
            .enumerate()
            .for_each(|(group, out)| {
                for thread in 0..group_size {
                    let index = group * group_size + thread;
                    if index >= count {
                        return;
                    }
                    out[thread] = kernel(index, snapshot);
                }
            });

        std::mem::swap(&mut buffers.front, &mut buffers.back);
    }
}
