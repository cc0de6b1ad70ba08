use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Source column for each destination column and source row offset for each
/// destination row. Rebuilt only when the window or framebuffer size changes.
pub struct ScaleLut {
    cols: Vec<usize>,
    rows: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            cols: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        let sx = src_w as f32 / dst_w.max(1) as f32;
        let sy = src_h as f32 / dst_h.max(1) as f32;

        let cols = (0..dst_w)
            .map(|x| ((x as f32 + 0.5) * sx).floor().clamp(0.0, src_w.saturating_sub(1) as f32) as usize)
            .collect();
        let rows = (0..dst_h)
            .map(|y| {
                let src_y = ((y as f32 + 0.5) * sy).floor().clamp(0.0, src_h.saturating_sub(1) as f32);
                src_y as usize * src_w
            })
            .collect();

        Self { cols, rows }
    }

    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.cols.len() == dst_w && self.rows.len() == dst_h
    }
}

/// Nearest-neighbour stretch of `src` into `dst` (row width `dw`), rows in parallel.
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], lut: &ScaleLut) {
    if dw == 0 {
        return;
    }
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(&row) = lut.rows.get(y) else {
            return;
        };
        for (px, &col) in dst_row.iter_mut().zip(&lut.cols) {
            *px = src[row + col];
        }
    });
}
