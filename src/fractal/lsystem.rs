use std::collections::HashMap;

use crate::fractal::types::{Point, TurtleSegment};

/// Réécrit l'axiome sur un nombre donné de générations.
///
/// À chaque génération, chaque symbole est remplacé par sa règle s'il en
/// a une, sinon recopié tel quel. La chaîne peut croître très vite : les
/// générations sont plafonnées par l'appelant (8 dans l'interface).
pub fn expand(axiom: &str, rules: &HashMap<char, String>, generations: u32) -> String {
    let mut current = axiom.to_string();
    for _ in 0..generations {
        let mut next = String::with_capacity(current.len() * 2);
        for symbol in current.chars() {
            match rules.get(&symbol) {
                Some(replacement) => next.push_str(replacement),
                None => next.push(symbol),
            }
        }
        current = next;
    }
    current
}

/// État de tortue empilé par `[` et restauré par `]`.
#[derive(Clone, Copy)]
struct TurtleState {
    x: f64,
    y: f64,
    angle: f64,
    depth: u32,
}

/// Interprète une chaîne de symboles en segments de tracé.
///
/// La tortue part de (0, 0) orientée vers le haut (angle -pi/2, y vers
/// le bas). Symboles reconnus :
///   F  avance en traçant        f  avance sans tracer
///   +  tourne à droite          -  tourne à gauche
///   [  empile l'état (la profondeur augmente)
///   ]  dépile l'état (sans effet si la pile est vide)
/// Tout autre symbole (X, Y, ...) est ignoré au tracé.
pub fn interpret(program: &str, step_length: f64, branching_angle_deg: f64) -> Vec<TurtleSegment> {
    let rotation = branching_angle_deg.to_radians();
    let mut segments = Vec::new();
    let mut stack: Vec<TurtleState> = Vec::new();
    let mut state = TurtleState {
        x: 0.0,
        y: 0.0,
        angle: -std::f64::consts::FRAC_PI_2,
        depth: 0,
    };

    for symbol in program.chars() {
        match symbol {
            'F' => {
                let nx = state.x + state.angle.cos() * step_length;
                let ny = state.y + state.angle.sin() * step_length;
                segments.push(TurtleSegment {
                    start: Point::new(state.x, state.y),
                    end: Point::new(nx, ny),
                    depth: state.depth,
                });
                state.x = nx;
                state.y = ny;
            }
            'f' => {
                state.x += state.angle.cos() * step_length;
                state.y += state.angle.sin() * step_length;
            }
            '+' => state.angle += rotation,
            '-' => state.angle -= rotation,
            '[' => {
                stack.push(state);
                state.depth += 1;
            }
            ']' => {
                if let Some(saved) = stack.pop() {
                    state = saved;
                }
            }
            _ => {}
        }
    }

    segments
}
