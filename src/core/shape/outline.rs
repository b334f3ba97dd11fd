//! Umriss-Operationen auf Segmentketten: Zusammenfassen, Vereinigen, Zerschneiden.

use super::{ShapeGeometry, ShapeKind};
use crate::core::segment::SegmentGeometry;
use crate::core::Coordinates;

/// Fasst aufeinanderfolgende Segmente gleicher Richtung zusammen.
///
/// Nach jeder Zusammenfassung wird an derselben Stelle weitergeprüft, damit
/// auch Läufe aus mehr als zwei kollinearen Segmenten verschmelzen.
pub fn clean_same_direction(segments: &[SegmentGeometry], closed: bool) -> Vec<SegmentGeometry> {
    let mut chain = segments.to_vec();
    let mut i = 0;
    while chain.len() > 1 && i < chain.len() {
        let j = if i + 1 < chain.len() {
            i + 1
        } else if closed {
            0
        } else {
            break;
        };
        match merge_pair(&chain[i], &chain[j]) {
            Some(merged) => {
                chain[i] = merged;
                chain.remove(j);
                if j < i {
                    i -= 1;
                }
            }
            None => i += 1,
        }
    }
    chain
}

/// Verschmilzt `first` mit seinem Nachfolger `second`, falls beide dieselbe
/// Richtung haben und aneinander anschließen.
pub(crate) fn merge_pair(
    first: &SegmentGeometry,
    second: &SegmentGeometry,
) -> Option<SegmentGeometry> {
    if first.is_circle() || second.is_circle() {
        return None;
    }
    if first.is_infinite || second.is_infinite || first.is_semi_infinite || second.is_semi_infinite
    {
        return None;
    }
    if !first.vertices[1].coincides(second.vertices[0])
        || !first.has_same_direction(second, 1, 0, false)
    {
        return None;
    }
    Some(match first.arc_center {
        Some(center) => SegmentGeometry::arc(
            first.vertices[0],
            second.vertices[1],
            center,
            first.counterclockwise,
        ),
        None => SegmentGeometry::line(first.vertices[0], second.vertices[1]),
    })
}

/// Zerlegt jedes Segment an allen Punkten, die auf ihm liegen.
fn refine(segments: &[SegmentGeometry], cut_points: &[Coordinates]) -> Vec<SegmentGeometry> {
    segments
        .iter()
        .flat_map(|segment| {
            let on_segment: Vec<Coordinates> = cut_points
                .iter()
                .copied()
                .filter(|p| segment.is_coordinates_on_segment(*p, 0.001))
                .collect();
            if on_segment.is_empty() {
                vec![*segment]
            } else {
                segment.divide_with(&on_segment)
            }
        })
        .collect()
}

/// Alle Schnitt- und Endpunkte von `other`, die auf Segmenten von `own` liegen.
fn mutual_points(own: &[SegmentGeometry], other: &[SegmentGeometry]) -> Vec<Coordinates> {
    let mut points: Vec<Coordinates> = other.iter().flat_map(|s| s.vertices).collect();
    for a in own {
        for b in other {
            if let Some(hits) = a.intersection_with(b, 0.001) {
                points.extend(hits);
            }
        }
    }
    points
}

/// Deckungsgleiche Segmente (Richtung egal).
fn same_segment(a: &SegmentGeometry, b: &SegmentGeometry) -> bool {
    if a.is_arc() != b.is_arc() {
        return false;
    }
    let ends_match = (a.vertices[0].coincides(b.vertices[0]) && a.vertices[1].coincides(b.vertices[1]))
        || (a.vertices[0].coincides(b.vertices[1]) && a.vertices[1].coincides(b.vertices[0]));
    ends_match && a.middle().coincides(b.middle())
}

/// Umriss der Vereinigung zweier geschlossener Formen mit gemeinsamer Kante.
///
/// `None`, wenn die Formen keine Kante teilen oder der Rest keinen
/// einzelnen geschlossenen Umriss ergibt.
pub fn merge_outlines(first: &ShapeGeometry, second: &ShapeGeometry) -> Option<Vec<SegmentGeometry>> {
    if first.kind != ShapeKind::Regular || second.kind != ShapeKind::Regular {
        return None;
    }
    if !first.is_closed() || !second.is_closed() {
        return None;
    }

    let a = refine(&first.segments, &mutual_points(&first.segments, &second.segments));
    let b = refine(&second.segments, &mutual_points(&second.segments, &first.segments));

    let mut removed_a = vec![false; a.len()];
    let mut removed_b = vec![false; b.len()];
    for (i, sa) in a.iter().enumerate() {
        if let Some(j) = (0..b.len()).find(|j| !removed_b[*j] && same_segment(sa, &b[*j])) {
            removed_a[i] = true;
            removed_b[j] = true;
        }
    }
    if !removed_a.iter().any(|r| *r) {
        return None;
    }

    let remaining: Vec<SegmentGeometry> = a
        .iter()
        .zip(&removed_a)
        .chain(b.iter().zip(&removed_b))
        .filter(|(_, removed)| !**removed)
        .map(|(s, _)| *s)
        .collect();

    let chain = chain_segments(remaining)?;
    Some(clean_same_direction(&chain, true))
}

/// Ordnet lose Segmente zu einer geschlossenen Kette (dreht Segmente bei Bedarf).
fn chain_segments(mut pool: Vec<SegmentGeometry>) -> Option<Vec<SegmentGeometry>> {
    if pool.is_empty() {
        return None;
    }
    let first = pool.remove(0);
    let start = first.vertices[0];
    let mut end = first.vertices[1];
    let mut chain = vec![first];

    while !end.coincides(start) {
        let index = pool
            .iter()
            .position(|s| s.vertices[0].coincides(end) || s.vertices[1].coincides(end))?;
        let mut next = pool.remove(index);
        if !next.vertices[0].coincides(end) {
            next = next.reversed(true);
        }
        end = next.vertices[1];
        chain.push(next);
    }
    // Reste bedeuten Löcher oder getrennte Teile
    pool.is_empty().then_some(chain)
}

/// Zerschneidet einen geschlossenen Umriss entlang der Sehne `from → to`
/// (optional über `via`). Liefert die beiden Teil-Umrisse.
pub fn split_outline(
    segments: &[SegmentGeometry],
    from: Coordinates,
    to: Coordinates,
    via: Option<Coordinates>,
) -> Option<(Vec<SegmentGeometry>, Vec<SegmentGeometry>)> {
    if from.coincides(to) {
        return None;
    }
    let refined = refine(segments, &[from, to]);
    let start_of = |p: Coordinates| refined.iter().position(|s| s.vertices[0].coincides(p));
    let ia = start_of(from)?;
    let ib = start_of(to)?;

    let n = refined.len();
    let walk = |from_index: usize, to_index: usize| -> Vec<SegmentGeometry> {
        let mut part = Vec::new();
        let mut k = from_index;
        while k != to_index {
            part.push(refined[k]);
            k = (k + 1) % n;
        }
        part
    };

    let chord = |a: Coordinates, b: Coordinates| -> Vec<SegmentGeometry> {
        match via {
            Some(c) => vec![SegmentGeometry::line(a, c), SegmentGeometry::line(c, b)],
            None => vec![SegmentGeometry::line(a, b)],
        }
    };

    let mut first = walk(ia, ib);
    first.extend(chord(to, from));
    let mut second = walk(ib, ia);
    second.extend(chord(from, to));
    Some((first, second))
}
