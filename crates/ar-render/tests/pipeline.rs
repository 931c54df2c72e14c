// SPDX-License-Identifier: MIT
//
// End-to-end: shapes through transform, viewport, tile grid and encoder,
// down to the bytes sent to the terminal.

use ar_geom::maths::Coord;
use ar_geom::{Mesh, Quad, Transform};
use ar_render::viewport::bounding_rect;
use ar_render::{CellRect, Renderer, Viewport};
use ar_term::attr::{AttrEncoder, AttrPolicy};
use ar_term::cell::Tile;
use ar_term::color::Color;
use ar_term::render::TerminalRenderer;
use ar_term::terminal::{FixedSize, Size, TerminalSize};
use pretty_assertions::assert_eq;

fn square(x: f64, y: f64, side: f64) -> Vec<Coord> {
    vec![
        Coord::new(x, y),
        Coord::new(x + side, y),
        Coord::new(x + side, y + side),
        Coord::new(x, y + side),
    ]
}

fn bytes(term: &TerminalRenderer) -> String {
    String::from_utf8(term.output_bytes().to_vec()).unwrap()
}

#[test]
fn quad_to_escape_codes() {
    let screen = FixedSize::new(3, 1);
    let mut renderer = Renderer::new(screen.size());
    let quad = Quad::new(Coord::new(1.0, 0.0), Coord::new(1.0, 1.0));
    renderer.draw_quad(
        &quad,
        &Transform::new(),
        Tile::solid(Color::RED).with_symbol('#'),
    );

    let mut term = TerminalRenderer::new(AttrEncoder::new(AttrPolicy::Ansi));
    let stats = term.render(renderer.tiles()).unwrap();
    assert_eq!(stats.rows_drawn, 1);

    assert_eq!(
        bytes(&term),
        concat!(
            "\x1b[?2026h\x1b[2J",
            "\x1b[1;1H\x1b[23;24;25;29;38;2;255;255;255;48;2;0;0;0m ",
            "\x1b[1;2H\x1b[48;2;255;0;0m#",
            "\x1b[1;3H\x1b[48;2;0;0;0m ",
            "\x1b[0m\x1b[?2026l",
        )
    );
}

#[test]
fn moving_a_shape_redraws_only_touched_rows() {
    let mut renderer = Renderer::new(Size::new(10, 6));
    let mesh = Mesh::new(square(0.0, 0.0, 2.0));
    let red = Tile::solid(Color::RED);
    let mut transform = Transform::new().with_position(Coord::new(1.0, 1.0));

    let mut term = TerminalRenderer::new(AttrEncoder::new(AttrPolicy::Ansi));
    renderer.draw_mesh(&mesh, &transform, red);
    term.render(renderer.tiles()).unwrap();

    // One cell right: rows 1 and 2 change, the rest stay.
    renderer.clear(Tile::EMPTY);
    transform.set_position(Coord::new(2.0, 1.0));
    renderer.draw_mesh(&mesh, &transform, red);
    let stats = term.render(renderer.tiles()).unwrap();

    assert_eq!(stats.rows_drawn, 2);
    assert_eq!(stats.rows_skipped, 4);
    let out = bytes(&term);
    assert!(out.contains("\x1b[2;1H"));
    assert!(out.contains("\x1b[3;1H"));
    assert!(!out.contains("\x1b[2J"));
}

#[test]
fn fully_outside_square_clips_to_nothing() {
    let vp = Viewport::from_size(Size::new(20, 10));
    assert!(vp.project(&square(25.0, 2.0, 3.0)).is_empty());
    assert!(vp.project(&square(2.0, -9.0, 3.0)).is_empty());

    let mut renderer = Renderer::new(Size::new(20, 10));
    let transform = Transform::new().with_position(Coord::new(-40.0, 0.0));
    renderer.draw_mesh(&Mesh::new(square(0.0, 0.0, 5.0)), &transform, Tile::new('x'));
    assert!(renderer.tiles().tiles().iter().all(|t| *t == Tile::EMPTY));
}

#[test]
fn fully_inside_square_is_unchanged() {
    let vp = Viewport::from_size(Size::new(20, 10));
    let sq = square(3.0, 2.0, 5.0);
    assert_eq!(vp.project(&sq), sq);
}

#[test]
fn bounding_rect_clamps_overflow_on_every_side() {
    let quad = Quad::new(Coord::new(0.0, 0.0), Coord::new(1.0, 1.0));
    let transform = Transform::new()
        .with_origin(Coord::new(0.5, 0.5))
        .with_scale(Coord::new(500.0, 300.0))
        .with_rotation(0.7);

    let rect = bounding_rect(&quad, &transform, Size::new(40, 12)).unwrap();
    assert_eq!(
        rect,
        CellRect {
            left: 0,
            top: 0,
            right: 39,
            bottom: 11
        }
    );
}

#[test]
fn rotated_quad_matches_its_inverse_transform() {
    let mut renderer = Renderer::new(Size::new(30, 30));
    let quad = Quad::new(Coord::new(0.0, 0.0), Coord::new(8.0, 4.0));
    let transform = Transform::new()
        .with_position(Coord::new(11.0, 13.0))
        .with_origin(Coord::new(4.0, 2.0))
        .with_rotation(std::f64::consts::FRAC_PI_4);
    renderer.draw_quad(&quad, &transform, Tile::new('q'));

    for (x, y, tile) in renderer.tiles().iter() {
        let centre = Coord::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let local = transform.reverse_transform(centre);
        let inside = (0.0..=8.0).contains(&local.x) && (0.0..=4.0).contains(&local.y);
        assert_eq!(tile.symbol() == 'q', inside, "cell ({x}, {y})");
    }
}
