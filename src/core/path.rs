//! Pfad-Grammatik (`M x y`, `L x y`, `H x`, `V y`, `A rx ry rot large sweep x y`, `Z`).
//!
//! Formen werden kompakt als Pfad-String persistiert. Bögen sind immer
//! Kreisbögen: `rx` ist der Radius, `ry` und die Rotation werden ignoriert.

use super::segment::SegmentGeometry;
use super::Coordinates;

/// Fehler beim Parsen eines Pfad-Strings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("unbekannter Pfad-Befehl '{0}'")]
    UnknownCommand(char),
    #[error("Befehl '{command}' erwartet {expected} Zahlen")]
    MissingArguments { command: char, expected: usize },
    #[error("ungueltige Zahl '{0}'")]
    InvalidNumber(String),
    #[error("ungueltiges Bogen-Flag '{0}' (erwartet 0 oder 1)")]
    InvalidFlag(String),
    #[error("Pfad beginnt nicht mit 'M'")]
    MissingMoveTo,
    #[error("leerer Pfad")]
    Empty,
}

/// Ein geparster Pfad-Befehl (nur absolute Koordinaten).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Coordinates),
    LineTo(Coordinates),
    Horizontal(f64),
    Vertical(f64),
    Arc {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        end: Coordinates,
    },
    Close,
}

/// Formatiert eine Zahl für Pfade (kürzeste exakte Darstellung, ohne `-0`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

// ── Tokenizer ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Command(char),
    Number(String),
}

fn tokenize(path: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = path.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() || ch == ',' {
            chars.next();
        } else if ch.is_ascii_alphabetic() && ch != 'e' && ch != 'E' {
            tokens.push(Token::Command(ch));
            chars.next();
        } else {
            let mut number = String::new();
            let mut seen_dot = false;
            while let Some(&c) = chars.peek() {
                let sign_allowed = number.is_empty() || number.ends_with(['e', 'E']);
                let accept = c.is_ascii_digit()
                    || ((c == '-' || c == '+') && sign_allowed)
                    || (c == '.' && !seen_dot)
                    || ((c == 'e' || c == 'E') && !number.is_empty());
                if !accept {
                    break;
                }
                seen_dot |= c == '.';
                number.push(c);
                chars.next();
            }
            if number.is_empty() {
                // unbekanntes Zeichen: als Befehl melden
                tokens.push(Token::Command(ch));
                chars.next();
            } else {
                tokens.push(Token::Number(number));
            }
        }
    }
    tokens
}

struct ArgReader<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl ArgReader<'_> {
    fn has_number(&self) -> bool {
        matches!(self.tokens.get(self.pos), Some(Token::Number(_)))
    }

    fn number(&mut self, command: char, expected: usize) -> Result<f64, PathError> {
        match self.tokens.get(self.pos) {
            Some(Token::Number(raw)) => {
                self.pos += 1;
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| PathError::InvalidNumber(raw.clone()))
            }
            _ => Err(PathError::MissingArguments { command, expected }),
        }
    }

    fn flag(&mut self, command: char, expected: usize) -> Result<bool, PathError> {
        match self.tokens.get(self.pos) {
            Some(Token::Number(raw)) => {
                self.pos += 1;
                match raw.as_str() {
                    "0" => Ok(false),
                    "1" => Ok(true),
                    other => Err(PathError::InvalidFlag(other.to_string())),
                }
            }
            _ => Err(PathError::MissingArguments { command, expected }),
        }
    }

    fn point(&mut self, command: char, expected: usize) -> Result<Coordinates, PathError> {
        let x = self.number(command, expected)?;
        let y = self.number(command, expected)?;
        Ok(Coordinates::new(x, y))
    }
}

/// Parst einen Pfad-String in Befehle.
///
/// Folgen auf einen Befehl weitere Zahlen, wird er wiederholt
/// (nach `M` als implizites `L`).
pub fn parse_path(path: &str) -> Result<Vec<PathCommand>, PathError> {
    let tokens = tokenize(path);
    let mut reader = ArgReader {
        tokens: &tokens,
        pos: 0,
    };
    let mut commands = Vec::new();

    while let Some(token) = tokens.get(reader.pos) {
        let Token::Command(letter) = token else {
            return Err(PathError::MissingMoveTo);
        };
        let letter = *letter;
        reader.pos += 1;
        let mut first = true;
        loop {
            let command = match letter {
                'M' if first => PathCommand::MoveTo(reader.point('M', 2)?),
                'M' | 'L' => PathCommand::LineTo(reader.point(letter, 2)?),
                'H' => PathCommand::Horizontal(reader.number('H', 1)?),
                'V' => PathCommand::Vertical(reader.number('V', 1)?),
                'A' => {
                    let radius = reader.number('A', 7)?;
                    let _ry = reader.number('A', 7)?;
                    let _rotation = reader.number('A', 7)?;
                    let large_arc = reader.flag('A', 7)?;
                    let sweep = reader.flag('A', 7)?;
                    let end = reader.point('A', 7)?;
                    PathCommand::Arc {
                        radius,
                        large_arc,
                        sweep,
                        end,
                    }
                }
                'Z' | 'z' => PathCommand::Close,
                other => return Err(PathError::UnknownCommand(other)),
            };
            commands.push(command);
            first = false;
            if matches!(letter, 'Z' | 'z') || !reader.has_number() {
                break;
            }
        }
    }

    match commands.first() {
        None => Err(PathError::Empty),
        Some(PathCommand::MoveTo(_)) => Ok(commands),
        Some(_) => Err(PathError::MissingMoveTo),
    }
}

/// Bogenzentrum aus der Endpunkt-Parametrisierung (Kreis, ohne Rotation).
///
/// Ein zu kleiner Radius wird wie in SVG hochskaliert. `None` bei
/// identischen Endpunkten.
pub fn arc_center(
    start: Coordinates,
    end: Coordinates,
    radius: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<Coordinates> {
    let half = (start - end) * 0.5;
    let d_squared = half.x * half.x + half.y * half.y;
    if d_squared <= f64::EPSILON {
        return None;
    }
    let mut r_squared = radius * radius;
    if d_squared > r_squared {
        r_squared = d_squared;
    }
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coef = sign * ((r_squared - d_squared) / d_squared).max(0.0).sqrt();
    let center_prime = Coordinates::new(coef * half.y, -coef * half.x);
    Some(center_prime + start.middle_with(end))
}

/// Wandelt einen Pfad in Segment-Geometrien um.
///
/// Ein weiteres `M` beginnt eine neue Kette; `Z` schließt die aktuelle
/// Kette mit einer Geraden, falls Start und Ende nicht zusammenfallen.
pub fn path_to_geometries(path: &str) -> Result<Vec<SegmentGeometry>, PathError> {
    let commands = parse_path(path)?;
    let mut segments = Vec::new();
    let mut current = Coordinates::ZERO;
    let mut subpath_start = Coordinates::ZERO;

    for command in commands {
        match command {
            PathCommand::MoveTo(p) => {
                current = p;
                subpath_start = p;
            }
            PathCommand::LineTo(p) => {
                push_line(&mut segments, current, p);
                current = p;
            }
            PathCommand::Horizontal(x) => {
                let p = Coordinates::new(x, current.y);
                push_line(&mut segments, current, p);
                current = p;
            }
            PathCommand::Vertical(y) => {
                let p = Coordinates::new(current.x, y);
                push_line(&mut segments, current, p);
                current = p;
            }
            PathCommand::Arc {
                radius,
                large_arc,
                sweep,
                end,
            } => {
                match arc_center(current, end, radius, large_arc, sweep) {
                    Some(center) => {
                        segments.push(SegmentGeometry::arc(current, end, center, !sweep));
                    }
                    None => log::debug!("Bogen mit identischen Endpunkten ignoriert"),
                }
                current = end;
            }
            PathCommand::Close => {
                push_line(&mut segments, current, subpath_start);
                current = subpath_start;
            }
        }
    }
    Ok(segments)
}

fn push_line(segments: &mut Vec<SegmentGeometry>, from: Coordinates, to: Coordinates) {
    // Null-Strecken sind verboten
    if !from.coincides(to) {
        segments.push(SegmentGeometry::line(from, to));
    }
}

/// Schreibt eine Segmentfolge als Pfad; `M` nur am Beginn jeder Kette.
pub fn geometries_to_path(segments: &[SegmentGeometry], scaling: f64) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(segments.len());
    let mut previous_end: Option<Coordinates> = None;
    for segment in segments {
        let starts_chain = previous_end
            .map(|end| !end.coincides(segment.vertices[0]))
            .unwrap_or(true);
        parts.push(segment.svg_path(scaling, starts_chain, false));
        previous_end = Some(segment.vertices[1]);
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parse_all_commands() {
        let commands = parse_path("M 0 0 L 10,0 H 12 V 5 A 5 5 0 0 1 7 10 Z")
            .expect("gueltiger Pfad");
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[0], PathCommand::MoveTo(Coordinates::new(0.0, 0.0)));
        assert_eq!(commands[2], PathCommand::Horizontal(12.0));
        assert!(matches!(
            commands[4],
            PathCommand::Arc {
                large_arc: false,
                sweep: true,
                ..
            }
        ));
        assert_eq!(commands[5], PathCommand::Close);
    }

    #[test]
    fn implicit_line_after_move() {
        let commands = parse_path("M0 0 10 0 10-10").expect("gueltiger Pfad");
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Coordinates::new(0.0, 0.0)),
                PathCommand::LineTo(Coordinates::new(10.0, 0.0)),
                PathCommand::LineTo(Coordinates::new(10.0, -10.0)),
            ]
        );
    }

    #[test]
    fn parse_errors_are_typed() {
        assert_eq!(parse_path(""), Err(PathError::Empty));
        assert_eq!(parse_path("L 1 1"), Err(PathError::MissingMoveTo));
        assert_eq!(parse_path("M 0 0 Q 1 1"), Err(PathError::UnknownCommand('Q')));
        assert_eq!(
            parse_path("M 0 0 A 5 5 0 2 1 3 3"),
            Err(PathError::InvalidFlag("2".to_string()))
        );
        assert!(matches!(
            parse_path("M 0"),
            Err(PathError::MissingArguments { command: 'M', .. })
        ));
    }

    #[test]
    fn arc_center_for_quarter_arc() {
        let center = arc_center(
            Coordinates::new(5.0, 0.0),
            Coordinates::new(0.0, 5.0),
            5.0,
            false,
            true,
        )
        .expect("Endpunkte verschieden");
        assert!(center.equal(Coordinates::ZERO, 1e-9));

        let large = arc_center(
            Coordinates::new(5.0, 0.0),
            Coordinates::new(0.0, 5.0),
            5.0,
            true,
            true,
        )
        .expect("Endpunkte verschieden");
        assert!(large.equal(Coordinates::new(5.0, 5.0), 1e-9));
    }

    #[test]
    fn small_radius_is_scaled_up() {
        let center = arc_center(
            Coordinates::new(-4.0, 0.0),
            Coordinates::new(4.0, 0.0),
            1.0,
            false,
            true,
        )
        .expect("Endpunkte verschieden");
        assert!(center.equal(Coordinates::ZERO, 1e-9));
    }

    #[test]
    fn closed_square_from_path() {
        let segments = path_to_geometries("M 0 0 H 10 V 10 H 0 Z").expect("gueltiger Pfad");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].vertices[1], Coordinates::new(0.0, 0.0));
    }

    #[test]
    fn circle_path_round_trip() {
        let circle = SegmentGeometry::circle(Coordinates::new(5.0, 0.0), Coordinates::ZERO, false);
        let path = geometries_to_path(&[circle], 1.0);
        let segments = path_to_geometries(&path).expect("gueltiger Pfad");
        assert_eq!(segments.len(), 2);
        for half in &segments {
            let center = half.arc_center.expect("Halbbogen");
            assert!(center.equal(Coordinates::ZERO, 1e-9));
            assert!(!half.counterclockwise);
            assert_abs_diff_eq!(half.span(), std::f64::consts::PI, epsilon = 1e-9);
        }
    }

    #[test]
    fn numbers_round_trip_exactly() {
        let value = 0.1 + 0.2;
        let written = format_number(value);
        assert_eq!(written.parse::<f64>().expect("Zahl"), value);
        assert_eq!(format_number(-0.0), "0");
    }
}
