//! GPIO pin assignments for the colour source switch board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Pins are given in BOARD numbering (physical
//! position on the Raspberry Pi 40-pin header, see https://pinout.xyz/);
//! the kernel wants BCM numbers, so [`board_to_bcm`] translates.
//!
//! Power for the switches: 3.3 V on pin 1, ground on pin 6.

// ---------------------------------------------------------------------------
// Momentary switches (active LOW, pull-up)
// ---------------------------------------------------------------------------

/// Red switch.
pub const RED_BOARD_PIN: u8 = 18;
/// Green switch.
pub const GREEN_BOARD_PIN: u8 = 16;
/// Blue switch.
pub const BLUE_BOARD_PIN: u8 = 22;

// ---------------------------------------------------------------------------
// Header map
// ---------------------------------------------------------------------------

/// `(board, bcm)` for every GPIO-capable header pin.
const HEADER: [(u8, u8); 28] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (27, 0),
    (28, 1),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

/// BCM GPIO number for a BOARD header pin, or `None` for power/ground pins.
pub fn board_to_bcm(board_pin: u8) -> Option<u8> {
    HEADER
        .iter()
        .find(|(board, _)| *board == board_pin)
        .map(|(_, bcm)| *bcm)
}
