use nu_ansi_term::Style;

use crate::program::Instruction;

pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        // Base colors
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134); // Subtle dim

        // Accents
        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const BLUE: Color = Color::Rgb(137, 180, 250);
        pub const MAUVE: Color = Color::Rgb(203, 166, 247);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
        pub const TEAL: Color = Color::Rgb(148, 226, 213);
        pub const SKY: Color = Color::Rgb(137, 220, 235);
    }
}

/// Style for one instruction when echoing program text.
///
/// > <   => SKY/TEAL (movement)
/// + -   => GREEN/RED (data modification)
/// . ,   => YELLOW/PEACH (I/O)
/// [ ]   => MAUVE (flow control)
pub fn instruction_style(instr: Instruction) -> Style {
    use catppuccin::Mocha as P;
    let color = match instr {
        Instruction::Right => P::SKY,
        Instruction::Left => P::TEAL,
        Instruction::Increment => P::GREEN,
        Instruction::Decrement => P::RED,
        Instruction::Output => P::YELLOW,
        Instruction::Input => P::PEACH,
        Instruction::LoopStart | Instruction::LoopEnd => P::MAUVE,
    };
    Style::new().fg(color).bold()
}

/// Style for headings such as "Memory Visualization:".
pub fn heading_style() -> Style {
    Style::new().fg(catppuccin::Mocha::BLUE).bold()
}
