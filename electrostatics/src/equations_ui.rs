//! Instruction sidebar and widget overlays
//!
//! The explanatory text, the equations and the per-widget buttons are drawn with
//! egui on top of the wgpu canvases. All text is in Spanish, the language of the
//! lesson.

use egui::{Align2, Color32, Context, Id, Pos2, RichText, Vec2 as EVec2};
use glam::Vec2;

use crate::constants::{CONTAINER_HEIGHT, CONTAINER_WIDTH, STREAM_X};
use crate::water::WaterStream;
use crate::worked_examples::{scientific, BalloonExample, WaterExample};

/// Window heading
pub const APP_TITLE: &str = "Simulador Estadístico: Electrostática";

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// A titled block of explanatory paragraphs
pub struct Section {
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
}

/// What the user asked a widget to do through its buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Charge,
    Reset,
}

/// Text placed inside a widget container
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Top-center of the text, container coordinates
    pub anchor: Vec2,
    pub text: &'static str,
}

/// Fixed text of one widget
pub struct WidgetText {
    pub id: &'static str,
    pub charge_button: &'static str,
    pub instructions: &'static [&'static str],
}

pub const BALLOON_TEXT: WidgetText = WidgetText {
    id: "balloon",
    charge_button: "Frotar Globo",
    instructions: &[
        "Haz clic en \"Frotar Globo\" para cargarlo",
        "Arrastra el globo cerca de los trozos de papel",
        "¡Observa el efecto de atracción!",
    ],
};

pub const WATER_TEXT: WidgetText = WidgetText {
    id: "water",
    charge_button: "Frotar Regla con Lana",
    instructions: &[
        "Haz clic en \"Frotar Regla con Lana\" para cargarla",
        "Arrastra la regla cerca del chorro de agua",
        "¡Observa cómo el chorro de agua se curva hacia la regla!",
    ],
};

pub const BALLOON_LABELS: &[Label] = &[
    Label {
        anchor: Vec2::new(120.0, 288.0),
        text: "Cabello",
    },
    Label {
        anchor: Vec2::new(264.0, 150.0),
        text: "Globo",
    },
    Label {
        anchor: Vec2::new(280.0, 330.0),
        text: "Trozos de Papel (Neutros)",
    },
];

pub fn water_labels(water: &WaterStream) -> Vec<Label> {
    let ruler = water.drag.live_rect().center();
    vec![
        Label {
            anchor: Vec2::new(STREAM_X + 20.0, 48.0),
            text: "Agua",
        },
        Label {
            anchor: Vec2::new(CONTAINER_WIDTH - 90.0, 172.0),
            text: "Lana",
        },
        Label {
            anchor: ruler - Vec2::new(0.0, 8.0),
            text: "Regla",
        },
    ]
}

fn to_pos(origin: Pos2, point: Vec2) -> Pos2 {
    origin + EVec2::new(point.x, point.y)
}

/// Labels, instructions box and buttons of a widget mounted at `origin`.
/// Returns the button the user pressed this frame, if any.
pub fn draw_widget_overlay(
    ctx: &Context,
    origin: Pos2,
    text: &WidgetText,
    labels: &[Label],
    can_charge: bool,
) -> Option<OverlayAction> {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Middle, Id::new((text.id, "labels"))));
    for label in labels {
        painter.text(
            to_pos(origin, label.anchor),
            Align2::CENTER_TOP,
            label.text,
            egui::FontId::proportional(13.0),
            Color32::from_rgb(0x1d, 0x4e, 0xd8),
        );
    }

    egui::Area::new(Id::new((text.id, "instructions")))
        .fixed_pos(to_pos(origin, Vec2::new(CONTAINER_WIDTH - 216.0, 16.0)))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(Color32::from_rgba_unmultiplied(255, 255, 255, 204))
                .rounding(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_max_width(200.0);
                    ui.label(RichText::new("Instrucciones:").strong().small().color(Color32::from_rgb(0x1e, 0x40, 0xaf)));
                    for (i, step) in text.instructions.iter().enumerate() {
                        ui.label(
                            RichText::new(format!("{}. {step}", i + 1))
                                .small()
                                .color(Color32::from_rgb(0x1e, 0x40, 0xaf)),
                        );
                    }
                });
        });

    let mut action = None;
    egui::Area::new(Id::new((text.id, "buttons")))
        .pivot(Align2::RIGHT_BOTTOM)
        .fixed_pos(to_pos(origin, Vec2::new(CONTAINER_WIDTH - 16.0, CONTAINER_HEIGHT - 16.0)))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.add_enabled(can_charge, egui::Button::new(text.charge_button)).clicked() {
                    action = Some(OverlayAction::Charge);
                }
                if ui.button("Reiniciar").clicked() {
                    action = Some(OverlayAction::Reset);
                }
            });
        });

    action
}

/// Draw the instruction sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    sections: &[Section],
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(320.0)
        .max_width(360.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for section in sections {
                    ui.collapsing(RichText::new(section.title).strong(), |ui| {
                        for paragraph in section.paragraphs {
                            ui.label(*paragraph);
                            ui.add_space(4.0);
                        }
                    });
                }

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📐 Ecuaciones").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("🧮 Cálculos").strong(), |ui| {
                    for line in worked_balloon_lines(&BalloonExample::default()) {
                        ui.label(RichText::new(line).monospace());
                    }
                    ui.separator();
                    for line in worked_water_lines(&WaterExample::default()) {
                        ui.label(RichText::new(line).monospace());
                    }
                });
            });
        });
}

/// Step-by-step Coulomb calculation for the balloon
pub fn worked_balloon_lines(example: &BalloonExample) -> Vec<String> {
    vec![
        "Globo y papel (Ley de Coulomb)".to_string(),
        format!("q₁ = {} C", scientific(example.q_balloon, 0)),
        format!("q₂ = {} C", scientific(example.q_paper, 0)),
        format!("r = {} m", example.distance),
        format!("F = k·|q₁·q₂| / r² = {} N", scientific(example.force(), 3)),
    ]
}

/// Dipole calculation for the water stream
pub fn worked_water_lines(example: &WaterExample) -> Vec<String> {
    vec![
        "Regla y agua (fuerza sobre un dipolo)".to_string(),
        format!("q = {} C, r = {} m, θ = {}°", scientific(example.q_ruler, 0), example.distance, example.theta.to_degrees()),
        format!("F molécula = {} N", scientific(example.force_per_molecule(), 2)),
        format!("N = {} moléculas ({} ml)", scientific(example.molecules(), 1), example.volume_ml),
        format!("F total = {} N", scientific(example.total_force(), 2)),
    ]
}

// ============================================================================
// Lesson text
// ============================================================================

pub const LESSON_SECTIONS: &[Section] = &[
    Section {
        title: "Presentación",
        paragraphs: &[
            "Esta herramienta interactiva está diseñada para ayudar a los estudiantes a comprender los principios de la electrostática a través de demostraciones visuales y experimentos prácticos.",
            "La electrostática es la rama de la física que trata con cargas eléctricas estacionarias o cargas que se mueven lentamente.",
            "¡Explora las explicaciones y prueba el simulador interactivo para ver estos principios en acción!",
        ],
    },
    Section {
        title: "Carga eléctrica",
        paragraphs: &[
            "La carga eléctrica es una propiedad fundamental de la materia. La materia puede tener carga positiva, negativa o neutra. Las cargas iguales se repelen entre sí, mientras que las cargas opuestas se atraen.",
            "La Ley de Coulomb establece que la fuerza entre dos partículas cargadas es directamente proporcional al producto de sus cargas e inversamente proporcional al cuadrado de la distancia entre ellas.",
        ],
    },
    Section {
        title: "Electricidad estática",
        paragraphs: &[
            "La electricidad estática ocurre cuando hay un desequilibrio de cargas eléctricas dentro o en la superficie de un material.",
            "El efecto triboeléctrico carga ciertos materiales cuando entran en contacto con otro material y luego se separan. Esto es lo que sucede cuando frotas un globo contra tu cabello.",
            "La inducción electrostática es la redistribución de carga en un objeto causada por cargas cercanas. Por eso un globo cargado puede atraer trozos de papel neutros.",
        ],
    },
    Section {
        title: "¿Qué sucede con el globo?",
        paragraphs: &[
            "1. Al frotar el globo contra el cabello, los electrones pasan del cabello al globo.",
            "2. El globo queda con carga negativa.",
            "3. Cerca del papel neutro, el globo induce una separación de carga.",
            "4. El lado del papel más cercano al globo se carga positivamente.",
            "5. Las cargas opuestas se atraen y el papel se mueve hacia el globo.",
        ],
    },
    Section {
        title: "¿Qué sucede con el agua?",
        paragraphs: &[
            "1. Al frotar la regla con lana se transfieren electrones y la regla queda cargada negativamente.",
            "2. El agua es una molécula polar, con un extremo ligeramente positivo y otro ligeramente negativo.",
            "3. Las moléculas se orientan con su lado positivo hacia la regla.",
            "4. Esa atracción curva el chorro de agua hacia la regla.",
            "5. Una fuerza diminuta por molécula, multiplicada por unas 3.3 × 10²² moléculas por mililitro, basta para desviar un chorro delgado.",
        ],
    },
];

pub const ELECTROSTATICS_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Ley de Coulomb",
        formula: "F = k·|q₁·q₂| / r²",
        description: "Fuerza entre dos cargas puntuales",
    },
    Equation {
        name: "Fuerza sobre un dipolo",
        formula: "F = |q·p·cos θ| / (4π·ε₀·r³)",
        description: "Carga puntual actuando sobre una molécula polar",
    },
    Equation {
        name: "Fuerza total",
        formula: "F_total = F_molécula · N",
        description: "Suma sobre todas las moléculas del chorro",
    },
    Equation {
        name: "Atracción del simulador",
        formula: "s = 2·(1 - min(d, 150)/150)",
        description: "Cada vez que sueltas el globo, el papel avanza 0.05·s del camino",
    },
    Equation {
        name: "Curvatura del simulador",
        formula: "c = signo(Δx)·(1 - |Δx|/200)·80",
        description: "Desplazamiento del chorro; nulo a 200 px o más",
    },
];

pub const ELECTROSTATICS_VARIABLES: &[(&str, &str)] = &[
    ("F", "Fuerza (N)"),
    ("k", "Constante de Coulomb = 9 × 10⁹ N·m²/C²"),
    ("q₁, q₂, q", "Cargas (C)"),
    ("r", "Distancia entre las cargas (m)"),
    ("p", "Momento dipolar del agua = 6.2 × 10⁻³⁰ C·m"),
    ("θ", "Ángulo entre el dipolo y el campo"),
    ("ε₀", "Permitividad del vacío = 8.85 × 10⁻¹² F/m"),
    ("N", "Número de moléculas"),
    ("d, Δx", "Distancia en pantalla (px)"),
];
