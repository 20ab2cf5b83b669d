// Author: Dustin Pilgrim
// License: MIT

use std::io::Write;

use cropkit_core::{CropOverlay, HandleId, Point, Rect};

use crate::host;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start dragging a named handle.
    Begin(HandleId),
    /// Pointer down at a location; drags whatever handle is there.
    Down(Point),
    /// Total translation since the drag started.
    Move(Point),
    End,
    /// Programmatic frame change through the overlay guard.
    Frame(Rect),
    /// Host re-centres the current rectangle in the overlay.
    Recenter,
    Print,
}

pub fn parse_script(src: &str) -> Result<Vec<Command>, String> {
    let mut out = Vec::new();

    for (idx, raw) in src.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let cmd = parse_line(line).map_err(|e| format!("line {}: {e}", idx + 1))?;
        out.push(cmd);
    }

    Ok(out)
}

fn parse_line(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let numbers = |n: usize| -> Result<Vec<f64>, String> {
        if args.len() != n {
            return Err(format!("{verb} takes {n} numbers, got {}", args.len()));
        }
        args.iter()
            .map(|a| a.parse::<f64>().map_err(|_| format!("not a number: \"{a}\"")))
            .collect()
    };

    match verb {
        "begin" => match args.as_slice() {
            [name] => name.parse().map(Command::Begin).map_err(|e| format!("{e}")),
            _ => Err("begin takes one handle name".into()),
        },
        "down" => numbers(2).map(|v| Command::Down(Point::new(v[0], v[1]))),
        "move" => numbers(2).map(|v| Command::Move(Point::new(v[0], v[1]))),
        "end" if args.is_empty() => Ok(Command::End),
        "frame" => numbers(4).map(|v| Command::Frame(Rect::new(v[0], v[1], v[2], v[3]))),
        "recenter" if args.is_empty() => Ok(Command::Recenter),
        "print" if args.is_empty() => Ok(Command::Print),
        "end" | "recenter" | "print" => Err(format!("{verb} takes no arguments")),
        other => Err(format!("unknown command \"{other}\"")),
    }
}

#[derive(Debug, Default)]
pub struct SessionReport {
    pub rect: Rect,
    /// Commands the overlay refused, in order.
    pub refused: Vec<String>,
}

/// Replay `commands` against `overlay`, writing one line per `print` and a
/// final line with the resulting rectangle.
pub fn run<W: Write>(
    overlay: &mut CropOverlay,
    commands: &[Command],
    mut out: W,
) -> Result<SessionReport, String> {
    let mut report = SessionReport::default();

    for cmd in commands {
        match cmd {
            Command::Begin(id) => {
                if !overlay.begin_drag(*id) {
                    report
                        .refused
                        .push(format!("begin {id}: another handle is dragging"));
                }
            }
            Command::Down(p) => {
                if overlay.pointer_down(*p).is_none() {
                    report
                        .refused
                        .push(format!("down ({}, {}): no handle there", p.x, p.y));
                }
            }
            Command::Move(t) => {
                overlay.pointer_moved(*t);
            }
            Command::End => overlay.pointer_up(),
            Command::Frame(r) => {
                if let Err(e) = overlay.set_point_frame(*r, false) {
                    report.refused.push(format!("frame: {e}"));
                }
            }
            Command::Recenter => {
                let r = host::recenter(overlay.point_rectangle(), overlay.bounds().size());
                if let Err(e) = overlay.set_point_frame(r, true) {
                    report.refused.push(format!("recenter: {e}"));
                }
            }
            Command::Print => {
                writeln!(out, "{}", overlay.point_rectangle()).map_err(|e| format!("write: {e}"))?;
            }
        }
    }

    report.rect = overlay.point_rectangle();
    writeln!(out, "{}", report.rect).map_err(|e| format!("write: {e}"))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use cropkit_core::{CropSettings, Size};

    use super::*;

    fn overlay() -> CropOverlay {
        CropOverlay::new(Size::new(200.0, 200.0), CropSettings::default())
    }

    #[test]
    fn test_parse_script() {
        let src = "\
# shrink from the right
begin right
move -20 5   # vertical part is ignored
end

frame 10 10 80 60
down 90 40
print
";
        let cmds = parse_script(src).unwrap();
        assert_eq!(
            cmds,
            vec![
                Command::Begin(HandleId::Right),
                Command::Move(Point::new(-20.0, 5.0)),
                Command::End,
                Command::Frame(Rect::new(10.0, 10.0, 80.0, 60.0)),
                Command::Down(Point::new(90.0, 40.0)),
                Command::Print,
            ]
        );
    }

    #[test]
    fn test_parse_errors_carry_line_number() {
        let err = parse_script("begin top\nmove 1\n").unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");

        let err = parse_script("\n\nspin 3\n").unwrap_err();
        assert!(err.starts_with("line 3:"), "{err}");

        let err = parse_script("begin middle").unwrap_err();
        assert!(err.contains("middle"), "{err}");

        assert!(parse_script("end now").is_err());
        assert!(parse_script("move a b").is_err());
    }

    #[test]
    fn test_run_prints_and_returns_final_rect() {
        let cmds = parse_script(
            "begin right\nmove -20 5\nend\nprint\nbegin bottom\nmove 0 10\nend\n",
        )
        .unwrap();
        let mut o = overlay();
        let mut out = Vec::new();

        let report = run(&mut o, &cmds, &mut out).unwrap();
        assert_eq!(report.rect, Rect::new(30.0, 30.0, 120.0, 150.0));
        assert!(report.refused.is_empty());

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "(30, 30, 120, 140)\n(30, 30, 120, 150)\n");
    }

    #[test]
    fn test_run_recenter_after_drag() {
        let cmds = parse_script("begin top-left\nmove -30 -30\nend\nrecenter\n").unwrap();
        let mut o = overlay();

        let report = run(&mut o, &cmds, std::io::sink()).unwrap();
        assert_eq!(report.rect, Rect::new(15.0, 15.0, 170.0, 170.0));
        assert!(report.refused.is_empty());
    }

    #[test]
    fn test_run_reports_second_begin_and_missed_down() {
        let cmds = parse_script("begin top\nbegin left\nend\ndown 100 100\n").unwrap();
        let mut o = overlay();

        let report = run(&mut o, &cmds, std::io::sink()).unwrap();
        assert_eq!(report.refused.len(), 2);
        assert_eq!(report.rect, Rect::new(30.0, 30.0, 140.0, 140.0));
    }

    #[test]
    fn test_run_pointer_routing_and_rejected_frame() {
        let cmds = parse_script("frame 150 150 100 100\ndown 30 30\nmove 10 10\nend\n").unwrap();
        let mut o = overlay();

        let report = run(&mut o, &cmds, std::io::sink()).unwrap();
        assert_eq!(report.rect, Rect::new(40.0, 40.0, 130.0, 130.0));
        assert_eq!(report.refused.len(), 1);
        assert!(report.refused[0].starts_with("frame:"), "{:?}", report.refused);
    }
}
