use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::vector::Vector2D;

/// Precomputed nearest-neighbour mapping from window pixels to framebuffer pixels
pub struct Stretch {
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
    xs: Vec<usize>,
    ys: Vec<usize>,
}

impl Stretch {
    pub fn new(src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Self {
        Self {
            src_w,
            src_h,
            dst_w,
            dst_h,
            xs: Self::lut(src_w, dst_w),
            ys: Self::lut(src_h, dst_h),
        }
    }

    fn lut(src: usize, dst: usize) -> Vec<usize> {
        let s = src as f32 / dst as f32;
        (0..dst)
            .map(|d| (((d as f32 + 0.5) * s) as usize).min(src.saturating_sub(1)))
            .collect()
    }

    #[inline]
    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.dst_w == dst_w && self.dst_h == dst_h
    }

    /// Rows are filled in parallel for cache friendly writes
    pub fn blit(&self, src: &[u32], dst: &mut [u32]) {
        if self.dst_w == 0 || self.src_w == 0 || self.src_h == 0 {
            return;
        }
        dst.par_chunks_mut(self.dst_w)
            .zip(self.ys.par_iter())
            .for_each(|(dst_row, &sy)| {
                let row = &src[sy * self.src_w..(sy + 1) * self.src_w];
                for (d, &sx) in dst_row.iter_mut().zip(&self.xs) {
                    *d = row[sx];
                }
            });
    }

    /// Window position to framebuffer pixel coordinates
    pub fn to_source(&self, window: Vector2D) -> Vector2D {
        if self.dst_w == 0 || self.dst_h == 0 {
            return window;
        }
        window
            * Vector2D::new(
                self.src_w as f64 / self.dst_w as f64,
                self.src_h as f64 / self.dst_h as f64,
            )
    }
}
