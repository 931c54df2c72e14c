// SPDX-License-Identifier: MIT
//
// The demo scene: a spinning square ring with a hole, a star orbiting it,
// a translucent quad panel and a title strip. Everything is placed relative
// to the current renderer size, so resizing the terminal recentres it.
//
// Terminal cells are roughly twice as tall as they are wide, so shapes are
// stretched 2:1 horizontally to look square on screen.

use std::f64::consts::{PI, TAU};

use ar_geom::maths::{Coord, Real};
use ar_geom::{Mesh, Quad, Transform};
use ar_render::Renderer;
use ar_term::cell::{Attr, Tile};
use ar_term::color::Color;

use crate::config::Settings;

const ASPECT: Coord = Coord::new(2.0, 1.0);
const SPIN: Real = 0.04;
const ORBIT: Real = 0.025;

pub struct Scene {
    ring: Mesh,
    star: Mesh,
    panel: Quad,
    background: Tile,
    ring_tile: Tile,
    star_tile: Tile,
    panel_tile: Tile,
    strip_tile: Tile,
}

impl Scene {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let fg = settings.foreground;
        Self {
            ring: Mesh::from_polygons(&[square(8.0), square(4.0)]),
            star: Mesh::new(star(5, 4.0, 1.6)),
            panel: Quad::new(Coord::new(-6.0, -2.0), Coord::new(12.0, 4.0)),
            background: Tile::solid(settings.background),
            ring_tile: Tile::new(settings.symbol)
                .with_fg(fg)
                .with_bg(Color::new(30, 60, 160)),
            star_tile: Tile::new('*')
                .with_fg(fg)
                .with_bg(Color::rgba(255, 96, 0, 200))
                .with_attrs(Attr::BOLD),
            panel_tile: Tile::solid(Color::rgba(0, 200, 120, 96)),
            strip_tile: Tile::new('=')
                .with_fg(fg.inverse())
                .with_bg(fg)
                .with_attrs(Attr::UNDERLINE),
        }
    }

    /// Paint frame number `frame` from scratch.
    pub fn draw(&self, renderer: &mut Renderer, frame: u32) {
        renderer.clear(self.background);

        let size = renderer.size();
        if size.is_empty() {
            return;
        }
        let centre = Coord::new(Real::from(size.cols), Real::from(size.rows)) / 2.0;
        let t = Real::from(frame);

        let ring = Transform::new()
            .with_position(centre)
            .with_scale(ASPECT)
            .with_rotation(t * SPIN);
        renderer.draw_mesh(&self.ring, &ring, self.ring_tile);

        let panel = Transform::new()
            .with_position(centre + Coord::new(0.0, Real::from(size.rows) / 3.0))
            .with_scale(ASPECT);
        renderer.draw_quad(&self.panel, &panel, self.panel_tile);

        let angle = t * ORBIT;
        let orbit = Coord::new(angle.cos(), angle.sin()) * 12.0 * ASPECT;
        let star = Transform::new()
            .with_position(centre + orbit)
            .with_scale(ASPECT)
            .with_rotation(-t * SPIN * 2.0);
        renderer.draw_mesh(&self.star, &star, self.star_tile);

        let right = Real::from(size.cols) - 1.0;
        renderer.draw_rect([Coord::ZERO, Coord::new(right, 0.0)], self.strip_tile);
        renderer.draw_tile(centre, Tile::new('+').with_bg(Color::TRANSPARENT));
    }
}

/// Square of half-width `r` around the origin, clockwise on screen.
fn square(r: Real) -> Vec<Coord> {
    vec![
        Coord::new(-r, -r),
        Coord::new(r, -r),
        Coord::new(r, r),
        Coord::new(-r, r),
    ]
}

/// A `points`-pointed star around the origin, clockwise on screen, first
/// point straight up.
fn star(points: u32, outer: Real, inner: Real) -> Vec<Coord> {
    let step = PI / Real::from(points);
    (0..points * 2)
        .map(|i| {
            let theta = Real::from(i).mul_add(step, -TAU / 4.0);
            let r = if i % 2 == 0 { outer } else { inner };
            Coord::new(theta.cos(), theta.sin()) * r
        })
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use ar_term::terminal::Size;

    use super::*;
    use crate::config::Config;

    fn scene() -> Scene {
        Scene::new(&Config::default().resolve().unwrap())
    }

    #[test]
    fn star_alternates_radii() {
        let pts = star(5, 4.0, 1.0);
        assert_eq!(pts.len(), 10);
        assert!((pts[0] - Coord::new(0.0, -4.0)).length() < 1e-12);
        assert!((pts[1].length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn star_is_inside_at_its_centre() {
        assert!(Mesh::new(star(5, 4.0, 1.6)).is_inside(Coord::new(0.1, 0.1)));
    }

    #[test]
    fn ring_has_a_hole() {
        let ring = Mesh::from_polygons(&[square(8.0), square(4.0)]);
        assert!(ring.is_inside(Coord::new(6.0, 0.5)));
        assert!(!ring.is_inside(Coord::new(0.5, 0.5)));
    }

    #[test]
    fn frame_draws_over_the_background() {
        let s = scene();
        let mut r = Renderer::new(Size::new(80, 24));
        s.draw(&mut r, 0);

        let tiles = r.tiles().tiles();
        assert!(tiles.iter().any(|t| t.symbol() == '#'));
        assert!(tiles.iter().any(|t| t.symbol() == '*'));
        assert!(tiles.iter().any(|t| *t == s.background));
        assert_eq!(r.tiles().get(0, 0).map(Tile::symbol), Some('='));
    }

    #[test]
    fn tiny_and_empty_screens_are_fine() {
        let s = scene();
        for size in [Size::new(1, 1), Size::new(0, 0), Size::new(3, 0)] {
            let mut r = Renderer::new(size);
            s.draw(&mut r, 17);
        }
    }
}
