// src/renderer.rs

use crate::error::{GraphError, Result};
use crate::graph_info::{PermanentGraphInfo, VisibleGraph};
use crate::linear_graph::EdgeTarget;
use image::{Rgb, RgbImage};
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub lane_width: u32,
    pub row_height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { lane_width: 16, row_height: 20 }
    }
}

const BACKGROUND: Rgb<u8> = Rgb([8, 8, 12]);
const LINE_HALF_WIDTH: f32 = 1.2;

#[derive(Debug, Clone, Copy)]
struct Segment {
    from: (f32, f32),
    to: (f32, f32),
    color: Rgb<u8>,
}

#[derive(Debug, Clone, Copy)]
struct Dot {
    center: (f32, f32),
    color: Rgb<u8>,
}

/// Draws the visible rows, one band of `row_height` pixels per row and one
/// column of `lane_width` pixels per lane.
pub fn render(info: &PermanentGraphInfo, view: &VisibleGraph, options: &RenderOptions) -> Result<RgbImage> {
    let layout = info.permanent_graph_layout();
    let graph = info.permanent_linear_graph();
    let colors = info.graph_color_manager();
    if options.lane_width == 0 || options.row_height == 0 {
        return Err(GraphError::InvalidRenderSize {
            lane_width: options.lane_width,
            row_height: options.row_height,
        });
    }

    let width = (layout.lane_count() as u32).max(1) * options.lane_width;
    let height = (view.row_count() as u32).max(1) * options.row_height;
    let rows = view.row_count().max(1);

    let center = |column: u32, row: usize| {
        (
            column as f32 * options.lane_width as f32 + options.lane_width as f32 / 2.0,
            row as f32 * options.row_height as f32 + options.row_height as f32 / 2.0,
        )
    };

    let mut dots = Vec::with_capacity(view.row_count());
    let mut segments = Vec::new();
    // Segment indices touching each graph row
    let mut by_row: Vec<Vec<usize>> = vec![Vec::new(); rows];

    for row in 0..view.row_count() {
        let node = view.node_at_row(row)?;
        let lane = layout.lane(node)?;
        let color = colors.color(lane)?;
        let from = center(lane as u32, row);
        dots.push(Dot { center: from, color });

        for target in graph.parent_targets(node)? {
            let (to, last_row) = match *target {
                EdgeTarget::Node(parent) => match view.row_of_node(parent) {
                    Some(parent_row) => (center(layout.lane(parent)? as u32, parent_row), parent_row),
                    None => continue,
                },
                // Stub pointing at history that isn't loaded
                EdgeTarget::NotLoaded(_) => ((from.0, from.1 + options.row_height as f32 * 0.5), row),
            };
            let index = segments.len();
            segments.push(Segment { from, to, color });
            for touched in &mut by_row[row..=last_row.min(rows - 1)] {
                touched.push(index);
            }
        }
    }

    let row_bytes = width as usize * 3;
    let mut buffer = vec![0u8; row_bytes * height as usize];
    let bar = ProgressBar::new(height as u64);
    bar.set_message("Rendering graph");

    buffer
        .par_chunks_mut(row_bytes)
        .enumerate()
        .progress_with(bar)
        .for_each(|(y, pixels)| {
            let graph_row = (y as u32 / options.row_height) as usize;
            let py = y as f32 + 0.5;
            let dot_radius = options.row_height.min(options.lane_width) as f32 * 0.3;
            for x in 0..width as usize {
                let p = (x as f32 + 0.5, py);
                let mut pixel = BACKGROUND;
                for &index in &by_row[graph_row.min(rows - 1)] {
                    let segment = &segments[index];
                    if distance_to_segment(p, segment.from, segment.to) <= LINE_HALF_WIDTH {
                        pixel = segment.color;
                    }
                }
                if let Some(dot) = dots.get(graph_row) {
                    let (dx, dy) = (p.0 - dot.center.0, p.1 - dot.center.1);
                    if dx * dx + dy * dy <= dot_radius * dot_radius {
                        pixel = dot.color;
                    }
                }
                pixels[x * 3..x * 3 + 3].copy_from_slice(&pixel.0);
            }
        });

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| GraphError::InvariantViolation("image buffer size mismatch".to_string()))
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let length_sq = abx * abx + aby * aby;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / length_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * abx, a.1 + t * aby);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::commit;

    fn info() -> PermanentGraphInfo {
        let log = vec![
            commit(4, "a2", &["a1"]),
            commit(3, "b1", &["a"]),
            commit(2, "a1", &["a"]),
            commit(1, "a", &[]),
        ];
        PermanentGraphInfo::build(&log, &[]).unwrap()
    }

    #[test]
    fn image_has_one_row_band_per_commit() {
        let info = info();
        let view = info.visible_graph(info.permanent_graph_layout().heads()).unwrap();
        let options = RenderOptions::default();
        let image = render(&info, &view, &options).unwrap();
        assert_eq!(image.height(), 4 * options.row_height);
        assert_eq!(image.width(), 2 * options.lane_width);
        // node dot of b1, the first commit on lane 0
        let lane0 = info.graph_color_manager().color(0).unwrap();
        let center = (options.lane_width / 2, options.row_height + options.row_height / 2);
        assert_eq!(*image.get_pixel(center.0, center.1), lane0);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let info = info();
        let view = info.visible_graph(info.permanent_graph_layout().heads()).unwrap();
        for options in [
            RenderOptions { lane_width: 0, row_height: 20 },
            RenderOptions { lane_width: 16, row_height: 0 },
        ] {
            assert!(matches!(
                render(&info, &view, &options),
                Err(GraphError::InvalidRenderSize { .. })
            ));
        }
    }

    #[test]
    fn segment_distance() {
        assert_eq!(distance_to_segment((0.0, 5.0), (0.0, 0.0), (0.0, 10.0)), 0.0);
        assert_eq!(distance_to_segment((3.0, -4.0), (0.0, 0.0), (0.0, 10.0)), 5.0);
    }
}
