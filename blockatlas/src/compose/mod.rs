//! Raster composition of tile sub-regions into a view buffer.
//!
//! Given a destination rectangle in absolute coordinates and a set of
//! candidate tiles, the compositor produces a single RGBA buffer of
//! exactly the requested size: zero-filled, with each tile's overlap
//! copied to the matching offset. Tile rectangles are pairwise disjoint
//! (one tile per block coordinate, blocks tile the plane), so the result
//! is independent of tile order and the parallel variant may write the
//! shared buffer without locking.

use image::RgbaImage;
use rayon::prelude::*;

use crate::geom::Rect;
use crate::tile::Tile;

const BYTES_PER_PIXEL: usize = 4;

fn output_size(rect: Rect) -> (u32, u32) {
    (rect.w.max(0) as u32, rect.h.max(0) as u32)
}

/// Composite the given tiles into a buffer covering `rect`, one tile at
/// a time.
pub(crate) fn compose(tiles: &[Tile], indices: &[usize], rect: Rect) -> RgbaImage {
    let (w, h) = output_size(rect);
    let mut buf = vec![0u8; w as usize * h as usize * BYTES_PER_PIXEL];
    for &i in indices {
        blit(&tiles[i], rect, &mut buf);
    }
    RgbaImage::from_raw(w, h, buf).expect("buffer sized to output dimensions")
}

/// Composite with one rayon task per tile, joined before returning.
///
/// Semantically identical to [`compose`]; the tasks write disjoint
/// regions of the shared buffer.
pub(crate) fn compose_parallel(tiles: &[Tile], indices: &[usize], rect: Rect) -> RgbaImage {
    let (w, h) = output_size(rect);
    let mut buf = vec![0u8; w as usize * h as usize * BYTES_PER_PIXEL];
    {
        let canvas = SharedCanvas {
            ptr: buf.as_mut_ptr(),
            len: buf.len(),
        };
        indices.par_iter().for_each(|&i| {
            // SAFETY: tile rects are pairwise disjoint, so every task's
            // destination rows are disjoint byte ranges of the buffer;
            // no write overlaps another task's writes or reads.
            unsafe { blit_shared(&tiles[i], rect, &canvas) };
        });
    }
    RgbaImage::from_raw(w, h, buf).expect("buffer sized to output dimensions")
}

/// Copy the overlap of `tile` and `dst_rect` into the destination buffer.
fn blit(tile: &Tile, dst_rect: Rect, dst: &mut [u8]) {
    let overlap = dst_rect.intersect(&tile.rect);
    if overlap.is_empty() {
        return;
    }
    let src_org = overlap - tile.rect.top_left();
    let dst_org = overlap - dst_rect.top_left();
    let src_stride = tile.raster.width() as usize * BYTES_PER_PIXEL;
    let dst_stride = dst_rect.w as usize * BYTES_PER_PIXEL;
    let row_len = overlap.w as usize * BYTES_PER_PIXEL;
    let src_buf = tile.raster.as_raw();
    for row in 0..overlap.h as usize {
        let s = (src_org.y as usize + row) * src_stride + src_org.x as usize * BYTES_PER_PIXEL;
        let d = (dst_org.y as usize + row) * dst_stride + dst_org.x as usize * BYTES_PER_PIXEL;
        dst[d..d + row_len].copy_from_slice(&src_buf[s..s + row_len]);
    }
}

/// Shared view of the output buffer for the parallel path.
///
/// Tasks write through the raw pointer; soundness rests on the caller
/// only handing each task a destination region disjoint from all others.
struct SharedCanvas {
    ptr: *mut u8,
    len: usize,
}

unsafe impl Send for SharedCanvas {}
unsafe impl Sync for SharedCanvas {}

/// Row-wise copy of the tile overlap into the shared canvas.
///
/// # Safety
///
/// The destination byte ranges derived from `tile.rect ∩ dst_rect` must
/// not overlap those of any other concurrent `blit_shared` call on the
/// same canvas.
unsafe fn blit_shared(tile: &Tile, dst_rect: Rect, canvas: &SharedCanvas) {
    let overlap = dst_rect.intersect(&tile.rect);
    if overlap.is_empty() {
        return;
    }
    let src_org = overlap - tile.rect.top_left();
    let dst_org = overlap - dst_rect.top_left();
    let src_stride = tile.raster.width() as usize * BYTES_PER_PIXEL;
    let dst_stride = dst_rect.w as usize * BYTES_PER_PIXEL;
    let row_len = overlap.w as usize * BYTES_PER_PIXEL;
    let src_buf = tile.raster.as_raw();
    for row in 0..overlap.h as usize {
        let s = (src_org.y as usize + row) * src_stride + src_org.x as usize * BYTES_PER_PIXEL;
        let d = (dst_org.y as usize + row) * dst_stride + dst_org.x as usize * BYTES_PER_PIXEL;
        debug_assert!(d + row_len <= canvas.len);
        std::ptr::copy_nonoverlapping(src_buf.as_ptr().add(s), canvas.ptr.add(d), row_len);
    }
}
