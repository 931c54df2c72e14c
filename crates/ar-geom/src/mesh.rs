// SPDX-License-Identifier: MIT
//
// Mesh — an editable set of polygons sharing one vertex list.
//
// Storage:
//
//   vertices  [v0, v1, v2, v3, v4, v5, v6]
//   faces     [0, 1, 2, 3, 0,  6, 5, 4, 6]
//              └─ face 0 ──┘  └ face 1 ─┘
//
// All faces live in ONE flat list of vertex indices ("corners"). A face is
// a contiguous run that starts with some corner and ends with that same
// corner repeated: the repeat is the face's terminator. No corner may
// appear twice inside a face, otherwise the end of the face would be
// ambiguous. Adjacent faces are simply concatenated.
//
// Scanning for terminators on every lookup is O(faces), so the mesh keeps a
// derived `spans` table (first index, terminator index) rebuilt whenever the
// flat list changes shape. The face count IS the span count, so it can never
// drift out of sync with the corners.
//
// Vertex indices are positional. Inserting or removing vertices shifts the
// indices of everything after them and does NOT rewrite face corners: fix
// up (or remove) the affected faces first.
//
// Misuse (an out-of-range index, a duplicate corner in a face, a missing
// terminator) is a programming error. It trips a `debug_assert!` in debug
// builds and is not checked in release builds.
//
// Winding: the containment test counts a downward edge to the left of the
// query point as +1, so outer boundaries wind counter-clockwise in y-up
// space (clockwise on a y-down terminal). Later faces are subtractive
// holes and wind the other way; `Mesh::from_polygons` reverses them for
// you.

use std::fmt;

use crate::line::{Line, LineSegment};
use crate::maths::{Coord, Real, snap_to_cell_centre};

/// Position of one face inside the flat corner list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceSpan {
    /// Index of the face's first corner.
    first: usize,
    /// Index of the face's terminator (a repeat of the first corner).
    last: usize,
}

impl FaceSpan {
    #[inline]
    const fn corner_count(self) -> usize {
        self.last - self.first
    }
}

/// Editable polygon set with sentinel-delimited faces.
///
/// ```
/// use ar_geom::{Coord, Mesh};
///
/// let square = Mesh::new(vec![
///     Coord::new(0.0, 0.0),
///     Coord::new(4.0, 0.0),
///     Coord::new(4.0, 4.0),
///     Coord::new(0.0, 4.0),
/// ]);
///
/// assert_eq!(square.face_count(), 1);
/// assert_eq!(square.faces(), &[0, 1, 2, 3, 0]);
/// assert!(square.is_inside(Coord::new(2.0, 2.0)));
/// assert!(!square.is_inside(Coord::new(5.0, 5.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Coord>,
    faces: Vec<usize>,
    spans: Vec<FaceSpan>,
}

impl Mesh {
    // ─── Constructors ────────────────────────────────────────────────────

    /// A single face looping through every vertex in order.
    ///
    /// An empty vertex list produces an empty mesh with no faces.
    #[must_use]
    pub fn new(vertices: Vec<Coord>) -> Self {
        if vertices.is_empty() {
            return Self::default();
        }

        let mut faces: Vec<usize> = (0..vertices.len()).collect();
        faces.push(0);

        let spans = vec![FaceSpan {
            first: 0,
            last: vertices.len(),
        }];

        Self {
            vertices,
            faces,
            spans,
        }
    }

    /// One face per closed polygon.
    ///
    /// The first polygon is the outer boundary and keeps its winding. Every
    /// later polygon is a hole: its corners are stored in reverse order,
    /// starting from its last vertex, so the containment test subtracts it.
    /// Vertices are stored in the order given. Empty polygons are skipped.
    #[must_use]
    pub fn from_polygons<P: AsRef<[Coord]>>(polygons: &[P]) -> Self {
        let total: usize = polygons.iter().map(|p| p.as_ref().len()).sum();
        let mut vertices = Vec::with_capacity(total);
        let mut faces = Vec::with_capacity(total + polygons.len());

        for poly in polygons.iter().map(AsRef::as_ref) {
            if poly.is_empty() {
                continue;
            }
            let base = vertices.len();
            let end = base + poly.len();
            vertices.extend_from_slice(poly);

            if faces.is_empty() {
                faces.extend(base..end);
                faces.push(base);
            } else {
                faces.extend((base..end).rev());
                faces.push(end - 1);
            }
        }

        let spans = scan_faces(&faces);
        Self {
            vertices,
            faces,
            spans,
        }
    }

    /// Adopt raw vertex and corner lists.
    ///
    /// Face boundaries are discovered by scanning for terminators. Debug
    /// builds additionally check every corner is in range and that no face
    /// repeats a corner.
    #[must_use]
    pub fn from_raw(vertices: Vec<Coord>, faces: Vec<usize>) -> Self {
        let spans = scan_faces(&faces);
        let mesh = Self {
            vertices,
            faces,
            spans,
        };
        mesh.debug_validate();
        mesh
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vert_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.spans.len()
    }

    /// All vertices, in index order.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Coord] {
        &self.vertices
    }

    /// The raw flat corner list, terminators included.
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Number of distinct corners in a face (the terminator is not counted).
    #[must_use]
    pub fn face_corner_count(&self, face: usize) -> usize {
        self.span(face).corner_count()
    }

    #[must_use]
    pub fn vertex(&self, index: usize) -> Coord {
        debug_assert!(index < self.vertices.len(), "vertex {index} is out of bounds");
        self.vertices[index]
    }

    pub fn vertex_mut(&mut self, index: usize) -> &mut Coord {
        debug_assert!(index < self.vertices.len(), "vertex {index} is out of bounds");
        &mut self.vertices[index]
    }

    pub fn set_vertex(&mut self, index: usize, value: Coord) {
        *self.vertex_mut(index) = value;
    }

    /// Corner `index` of `face`. `index == face_corner_count(face)` yields
    /// the terminator.
    #[must_use]
    pub fn corner(&self, face: usize, index: usize) -> usize {
        let span = self.span(face);
        debug_assert!(
            index <= span.corner_count(),
            "corner {index} is out of bounds for face {face}"
        );
        self.faces[span.first + index]
    }

    /// The vertex that corner `index` of `face` refers to.
    #[must_use]
    pub fn corner_vertex(&self, face: usize, index: usize) -> Coord {
        self.vertex(self.corner(face, index))
    }

    /// Point corner `index` of `face` at a different vertex.
    ///
    /// Replacing corner 0 also replaces the terminator.
    pub fn set_corner(&mut self, face: usize, index: usize, corner: usize) {
        let span = self.span(face);
        debug_assert!(
            index < span.corner_count(),
            "corner {index} is out of bounds for face {face}"
        );
        debug_assert!(corner < self.vertices.len(), "corner {corner} is out of bounds");
        debug_assert!(
            self.faces[span.first..span.last]
                .iter()
                .enumerate()
                .all(|(i, &c)| i == index || c != corner),
            "face {face} already contains corner {corner}"
        );

        self.faces[span.first + index] = corner;
        if index == 0 {
            self.faces[span.last] = corner;
        }
    }

    /// Edge `index` of `face`: from corner `index` to corner `index + 1`.
    #[must_use]
    pub fn edge(&self, face: usize, index: usize) -> LineSegment {
        debug_assert!(
            index < self.face_corner_count(face),
            "edge {index} is out of bounds for face {face}"
        );
        LineSegment::from_points(
            self.corner_vertex(face, index),
            self.corner_vertex(face, index + 1),
        )
    }

    /// Every edge of `face` in order, closing edge included.
    pub fn edges(&self, face: usize) -> impl Iterator<Item = LineSegment> + '_ {
        let span = self.span(face);
        self.faces[span.first..=span.last].windows(2).map(|pair| {
            LineSegment::from_points(self.vertices[pair[0]], self.vertices[pair[1]])
        })
    }

    /// The vertices of `face` in corner order, terminator excluded.
    pub fn face_vertices(&self, face: usize) -> impl Iterator<Item = Coord> + '_ {
        let span = self.span(face);
        self.faces[span.first..span.last]
            .iter()
            .map(|&c| self.vertices[c])
    }

    /// Mean of all vertices. `Coord::ZERO` for an empty mesh.
    #[must_use]
    pub fn median_vertex(&self) -> Coord {
        if self.vertices.is_empty() {
            return Coord::ZERO;
        }
        #[allow(clippy::cast_precision_loss)] // Vertex counts stay far below 2^52.
        let count = self.vertices.len() as Real;
        self.vertices.iter().copied().sum::<Coord>() / count
    }

    // ─── Containment ─────────────────────────────────────────────────────

    /// Winding-number point-in-polygon test across all faces.
    ///
    /// A horizontal ray is cast through `point`. Every edge crossing it at
    /// or left of `point` adds +1 when it runs downward (or is level) and
    /// -1 when it runs upward. An edge lying ON the ray instead adds ±1
    /// when `point` sits on it: +1 for the first face, -1 for every later
    /// face, so boundaries shared with a hole stay outside.
    ///
    /// The point is inside when the total is strictly positive. For the
    /// square (0,0) (4,0) (4,4) (0,4) this puts the left, bottom and top
    /// edges inside and the right edge outside.
    #[must_use]
    pub fn is_inside(&self, point: Coord) -> bool {
        let ray = Line::horizontal(point);
        let mut winding: i32 = 0;

        for face in 0..self.face_count() {
            let collinear_sign = if face > 0 { -1 } else { 1 };

            for edge in self.edges(face) {
                if !edge.crosses(&ray) {
                    continue;
                }
                if edge.is_parallel(&ray) {
                    if edge.contains(point) {
                        winding += collinear_sign;
                    }
                } else if let Some(hit) = edge.intersection(&ray) {
                    if hit.x <= point.x {
                        winding += if edge.direction.y <= 0.0 { 1 } else { -1 };
                    }
                }
            }
        }

        winding > 0
    }

    /// [`is_inside`](Self::is_inside) for the centre of the grid cell of
    /// size `resolution` containing `point`.
    #[must_use]
    pub fn is_inside_grid(&self, point: Coord, resolution: Real) -> bool {
        self.is_inside(snap_to_cell_centre(point, resolution))
    }

    // ─── Vertex Editing ──────────────────────────────────────────────────

    /// Append a vertex.
    pub fn add_vertex(&mut self, vertex: Coord) {
        self.vertices.push(vertex);
    }

    /// Insert a vertex at `index`, shifting later vertices up by one.
    ///
    /// Face corners are not re-indexed.
    pub fn add_vertex_at(&mut self, vertex: Coord, index: usize) {
        debug_assert!(index <= self.vertices.len(), "vertex index {index} is out of bounds");
        self.vertices.insert(index, vertex);
    }

    /// Append several vertices.
    pub fn add_vertices(&mut self, vertices: &[Coord]) {
        self.vertices.extend_from_slice(vertices);
    }

    /// Insert several vertices at `index`, shifting later vertices up.
    ///
    /// Face corners are not re-indexed.
    pub fn add_vertices_at(&mut self, vertices: &[Coord], index: usize) {
        debug_assert!(index <= self.vertices.len(), "vertex index {index} is out of bounds");
        self.vertices.splice(index..index, vertices.iter().copied());
    }

    /// Remove one vertex. See [`remove_vertices`](Self::remove_vertices).
    pub fn remove_vertex(&mut self, index: usize) {
        self.remove_vertices(index, 1);
    }

    /// Remove `count` vertices starting at `begin`.
    ///
    /// Faces are NOT touched: remove or rewrite every face referring to
    /// these or later vertices first. Debug builds check that all corners
    /// remain in range afterwards.
    pub fn remove_vertices(&mut self, begin: usize, count: usize) {
        debug_assert!(
            begin + count <= self.vertices.len(),
            "vertex range {begin}..{} is out of bounds",
            begin + count
        );
        self.vertices.drain(begin..begin + count);

        debug_assert!(
            self.faces.iter().all(|&c| c < self.vertices.len()),
            "a face corner is no longer in bounds after removing vertices {begin}..{}",
            begin + count
        );
    }

    /// Move every vertex by `by`.
    pub fn offset(&mut self, by: Coord) -> &mut Self {
        for v in &mut self.vertices {
            *v += by;
        }
        self
    }

    // ─── Face Editing ────────────────────────────────────────────────────

    /// Append a single-corner face starting (and ending) at `start_vert`.
    pub fn add_face(&mut self, start_vert: usize) {
        self.add_face_at(start_vert, self.face_count());
    }

    /// Insert a single-corner face so it becomes face number `index`.
    pub fn add_face_at(&mut self, start_vert: usize, index: usize) {
        self.add_face_corners_at(&[start_vert], index);
    }

    /// Append a face made of `corners`; the first corner is repeated as the
    /// terminator.
    pub fn add_face_corners(&mut self, corners: &[usize]) {
        self.add_face_corners_at(corners, self.face_count());
    }

    /// Insert a face made of `corners` so it becomes face number `index`.
    pub fn add_face_corners_at(&mut self, corners: &[usize], index: usize) {
        debug_assert!(!corners.is_empty(), "a face needs at least one corner");
        debug_assert!(index <= self.face_count(), "face index {index} is out of bounds");
        self.debug_check_new_corners(corners, &[]);

        let at = self.face_insert_position(index);
        let terminator = corners[0];
        self.faces.splice(
            at..at,
            corners.iter().copied().chain(std::iter::once(terminator)),
        );
        self.reindex();
    }

    /// Append `corner` to the end of `face` (just before the terminator).
    pub fn extend_face(&mut self, face: usize, corner: usize) {
        let end = self.face_corner_count(face);
        self.extend_face_corners_at(face, &[corner], end);
    }

    /// Insert `corner` into `face` at corner position `index`.
    ///
    /// Inserting at 0 makes `corner` the face's new first corner, so the
    /// terminator is rewritten to match.
    pub fn extend_face_at(&mut self, face: usize, corner: usize, index: usize) {
        self.extend_face_corners_at(face, &[corner], index);
    }

    /// Append several corners to the end of `face`.
    pub fn extend_face_corners(&mut self, face: usize, corners: &[usize]) {
        let end = self.face_corner_count(face);
        self.extend_face_corners_at(face, corners, end);
    }

    /// Insert several corners into `face` starting at corner position
    /// `index`.
    pub fn extend_face_corners_at(&mut self, face: usize, corners: &[usize], index: usize) {
        if corners.is_empty() {
            return;
        }
        let span = self.span(face);
        debug_assert!(
            index <= span.corner_count(),
            "corner index {index} is out of bounds for face {face}"
        );
        self.debug_check_new_corners(corners, &self.faces[span.first..span.last]);

        if index == 0 {
            self.faces[span.last] = corners[0];
        }
        let at = span.first + index;
        self.faces.splice(at..at, corners.iter().copied());
        self.reindex();
    }

    /// Create a face from the consecutive vertices `start..stop`.
    ///
    /// The face starts at `stop - 1` and then walks `start..stop - 1`:
    /// the same loop, rotated so its last vertex leads.
    pub fn join_as_face(&mut self, start: usize, stop: usize) {
        debug_assert!(start < stop, "starting index {start} cannot be ahead of {stop}");
        debug_assert!(stop <= self.vertices.len(), "vertex index {stop} is out of bounds");

        let corners: Vec<usize> = std::iter::once(stop - 1).chain(start..stop - 1).collect();
        self.add_face_corners(&corners);
    }

    /// Remove `face` entirely, terminator included.
    pub fn remove_face(&mut self, face: usize) {
        let span = self.span(face);
        self.faces.drain(span.first..=span.last);
        self.reindex();
    }

    /// Remove corner `index` from `face`.
    ///
    /// Removing the only corner removes the face. Removing corner 0 promotes
    /// the next corner to first and rewrites the terminator to match.
    pub fn decrease_face(&mut self, face: usize, index: usize) {
        let span = self.span(face);
        debug_assert!(
            index < span.corner_count(),
            "corner {index} is out of bounds for face {face}"
        );

        if span.corner_count() == 1 {
            self.remove_face(face);
            return;
        }

        if index == 0 {
            self.faces[span.last] = self.faces[span.first + 1];
        }
        self.faces.remove(span.first + index);
        self.reindex();
    }

    // ─── Internals ───────────────────────────────────────────────────────

    #[inline]
    fn span(&self, face: usize) -> FaceSpan {
        debug_assert!(face < self.spans.len(), "face {face} is out of bounds");
        self.spans[face]
    }

    /// Flat-list position where a face inserted as number `index` begins.
    fn face_insert_position(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.span(index - 1).last + 1
        }
    }

    fn reindex(&mut self) {
        self.spans = scan_faces(&self.faces);
    }

    /// Check corners about to join a face: in range, unique among
    /// themselves, and absent from the face's `existing` corners.
    fn debug_check_new_corners(&self, corners: &[usize], existing: &[usize]) {
        if !cfg!(debug_assertions) {
            return;
        }
        for (i, &c) in corners.iter().enumerate() {
            assert!(c < self.vertices.len(), "corner {c} is out of bounds");
            assert!(
                !corners[..i].contains(&c) && !existing.contains(&c),
                "cannot have corner {c} twice in a face"
            );
        }
    }

    fn debug_validate(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        for (face, span) in self.spans.iter().enumerate() {
            let corners = &self.faces[span.first..span.last];
            for (i, &c) in corners.iter().enumerate() {
                assert!(
                    c < self.vertices.len(),
                    "face {face} corner {c} is out of bounds"
                );
                assert!(
                    !corners[..i].contains(&c),
                    "face {face} has corner {c} more than once"
                );
            }
        }
    }
}

/// Find every face in a flat corner list.
fn scan_faces(faces: &[usize]) -> Vec<FaceSpan> {
    let mut spans = Vec::new();
    let mut first = 0;

    while first < faces.len() {
        let start = faces[first];
        let Some(offset) = faces[first + 1..].iter().position(|&c| c == start) else {
            if cfg!(debug_assertions) {
                panic!("face starting at position {first} is missing its terminator");
            }
            log::error!("face starting at position {first} is missing its terminator");
            break;
        };
        let last = first + 1 + offset;
        spans.push(FaceSpan { first, last });
        first = last + 1;
    }

    spans
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VERTS: ")?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", v.x, v.y)?;
        }

        write!(f, "\nFACES: ")?;
        if self.spans.is_empty() {
            return write!(f, "None");
        }
        for span in &self.spans {
            writeln!(f)?;
            for (i, c) in self.faces[span.first..=span.last].iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
