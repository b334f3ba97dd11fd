//! Unveränderlicher 2D-Vektor als Wertetyp für alle Geometrie-Berechnungen.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

/// Toleranz für geometrische Koinzidenz (Punkt-Gleichheit, Segment-Merge, Dedup).
pub const COINCIDENCE_EPSILON: f64 = 0.001;

/// Standard-Präzision für Schnittpunkt-Filter (präzisionsempfindliche Pfade).
pub const INTERSECTION_PRECISION: f64 = 1.0;

/// 2D-Koordinaten (Welt-Einheiten). Arithmetik ist exakt, Gleichheit über `equal`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    /// Ursprung (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Erstellt neue Koordinaten.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Einheitsvektor in Richtung `angle` (Radiant).
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    fn vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Komponentenweise Addition.
    pub fn add(self, other: Self) -> Self {
        (self.vec() + other.vec()).into()
    }

    /// Komponentenweise Subtraktion.
    pub fn subtract(self, other: Self) -> Self {
        (self.vec() - other.vec()).into()
    }

    /// Skaliert x und y getrennt (`multiply(s, s)` = gleichmäßige Skalierung).
    pub fn multiply(self, scalar_x: f64, scalar_y: f64) -> Self {
        (self.vec() * DVec2::new(scalar_x, scalar_y)).into()
    }

    /// Euklidische Distanz.
    pub fn dist(self, other: Self) -> f64 {
        self.vec().distance(other.vec())
    }

    /// Länge des Vektors.
    pub fn length(self) -> f64 {
        self.vec().length()
    }

    /// Normierter Vektor (Nullvektor bleibt Nullvektor).
    pub fn normalize(self) -> Self {
        self.vec().normalize_or_zero().into()
    }

    /// Skalarprodukt.
    pub fn dot(self, other: Self) -> f64 {
        self.vec().dot(other.vec())
    }

    /// 2D-Kreuzprodukt (z-Komponente).
    pub fn cross(self, other: Self) -> f64 {
        self.vec().perp_dot(other.vec())
    }

    /// Winkel des Vektors `self → other`, normiert auf [0, 2π).
    pub fn angle_with(self, other: Self) -> f64 {
        let delta = other.vec() - self.vec();
        normalize_angle(delta.y.atan2(delta.x))
    }

    /// Rotiert um `center` um `angle` (Radiant, positive Richtung = steigender Winkel).
    pub fn rotate(self, angle: f64, center: Self) -> Self {
        let rotated = DVec2::from_angle(angle).rotate(self.vec() - center.vec());
        (rotated + center.vec()).into()
    }

    /// Mittelpunkt zwischen zwei Koordinaten.
    pub fn middle_with(self, other: Self) -> Self {
        ((self.vec() + other.vec()) * 0.5).into()
    }

    /// Lineare Interpolation (`t = 0` → self, `t = 1` → other).
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self.vec().lerp(other.vec(), t).into()
    }

    /// Spiegelt an der Geraden durch `a` und `b`.
    pub fn reflect(self, a: Self, b: Self) -> Self {
        let dir = (b.vec() - a.vec()).normalize_or_zero();
        if dir == DVec2::ZERO {
            return self;
        }
        let rel = self.vec() - a.vec();
        let projected = dir * rel.dot(dir);
        (a.vec() + projected * 2.0 - rel).into()
    }

    /// Geometrische Koinzidenz: `dist(self, other) <= epsilon`.
    ///
    /// Einzige Quelle der Wahrheit für Punkt-Gleichheit im gesamten Kern.
    pub fn equal(self, other: Self, epsilon: f64) -> bool {
        self.dist(other) <= epsilon
    }

    /// `equal` mit der Standard-Toleranz [`COINCIDENCE_EPSILON`].
    pub fn coincides(self, other: Self) -> bool {
        self.equal(other, COINCIDENCE_EPSILON)
    }
}

/// Normiert einen Winkel auf [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid kann durch Rundung exakt TAU liefern
    if a >= TAU {
        0.0
    } else {
        a
    }
}

impl From<DVec2> for Coordinates {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Coordinates> for DVec2 {
    fn from(c: Coordinates) -> Self {
        DVec2::new(c.x, c.y)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Coordinates {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Coordinates::add(self, rhs)
    }
}

impl Sub for Coordinates {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Coordinates {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.multiply(rhs, rhs)
    }
}

impl Neg for Coordinates {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn equal_is_reflexive_and_symmetric() {
        let a = Coordinates::new(3.0, -4.0);
        let b = Coordinates::new(3.0005, -4.0005);
        assert!(a.equal(a, COINCIDENCE_EPSILON));
        assert_eq!(a.coincides(b), b.coincides(a));
        assert!(a.coincides(b));
    }

    #[test]
    fn equal_respects_epsilon_boundary() {
        let a = Coordinates::new(0.0, 0.0);
        assert!(a.coincides(Coordinates::new(0.001, 0.0)));
        assert!(!a.coincides(Coordinates::new(0.0011, 0.0)));
    }

    #[test]
    fn angle_with_is_normalized() {
        let origin = Coordinates::ZERO;
        assert_abs_diff_eq!(origin.angle_with(Coordinates::new(1.0, 0.0)), 0.0);
        assert_abs_diff_eq!(
            origin.angle_with(Coordinates::new(0.0, -1.0)),
            3.0 * FRAC_PI_2,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(origin.angle_with(Coordinates::new(-1.0, 0.0)), PI);
    }

    #[test]
    fn rotate_around_center() {
        let p = Coordinates::new(2.0, 1.0);
        let rotated = p.rotate(FRAC_PI_2, Coordinates::new(1.0, 1.0));
        assert!(rotated.equal(Coordinates::new(1.0, 2.0), 1e-9));
    }

    #[test]
    fn multiply_with_separate_factors() {
        let p = Coordinates::new(2.0, 3.0).multiply(2.0, -1.0);
        assert_eq!(p, Coordinates::new(4.0, -3.0));
    }

    #[test]
    fn reflect_across_vertical_axis() {
        let p = Coordinates::new(3.0, 5.0);
        let mirrored = p.reflect(Coordinates::new(1.0, 0.0), Coordinates::new(1.0, 10.0));
        assert!(mirrored.equal(Coordinates::new(-1.0, 5.0), 1e-9));
    }

    #[test]
    fn middle_with_and_dist() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(6.0, 8.0);
        assert_eq!(a.middle_with(b), Coordinates::new(3.0, 4.0));
        assert_abs_diff_eq!(a.dist(b), 10.0);
    }
}
