//! Command codes understood by the peripheral controller.
//!
//! A command code is the first payload byte of every frame and is identical in
//! a request and in the reply that answers it. Four codes also carry
//! unsolicited event frames pushed by the controller: key presses, touch
//! coordinates, card-search results and IC card status.

use std::fmt;

/// Select the communication module.
pub const SET_COMM_MODE: u8 = 0x11;
/// Query the network mode.
pub const GET_NETWORK_MODE: u8 = 0x12;
/// Read system version information.
pub const GET_SYSTEM_VERSION: u8 = 0x17;
/// Read the hardware serial number.
pub const GET_HARDWARE_SERIAL_NUMBER: u8 = 0x18;
/// Read the device model.
pub const GET_DEVICE_MODEL: u8 = 0x19;
/// Read the customer-defined serial number.
pub const GET_CUSTOMER_SERIAL_NUMBER: u8 = 0x1A;
/// Set the real-time clock.
pub const SET_CLOCK: u8 = 0x1B;
/// Read the real-time clock.
pub const GET_CLOCK: u8 = 0x1C;
/// Sound the buzzer.
pub const BEEP: u8 = 0x20;
/// Sound the buzzer at a given frequency.
pub const BEEP_FREQUENCY: u8 = 0x21;
/// Light indicator LEDs.
pub const LED_ON: u8 = 0x22;
/// Turn indicator LEDs off.
pub const LED_OFF: u8 = 0x23;
/// Flash indicator LEDs.
pub const LED_FLASH: u8 = 0x24;
/// Reset the controller.
pub const SYSTEM_RESET: u8 = 0x25;
/// Power the controller down.
pub const SYSTEM_SHUTDOWN: u8 = 0x26;
/// Write the terminal serial number.
pub const SET_TERMINAL_SERIAL_NUMBER: u8 = 0x28;
/// Read the chip serial number.
pub const GET_CHIP_SERIAL_NUMBER: u8 = 0x29;
/// Enter sleep mode immediately.
pub const ENABLE_SLEEP_MODE: u8 = 0x2A;
/// Enter the bootloader or query its state.
pub const ENTER_BOOT_OR_QUERY_STATE: u8 = 0x2F;
/// Open the keypad.
pub const OPEN_KEYBOARD: u8 = 0x30;
/// Close the keypad.
pub const CLOSE_KEYBOARD: u8 = 0x31;
/// Key press event.
pub const READ_KEYBOARD_INPUT: u8 = 0x32;
/// Clear buffered key presses.
pub const CLEAR_KEYBOARD_CACHE: u8 = 0x33;
/// Enable or disable key click.
pub const SET_KEYBOARD_SOUND: u8 = 0x34;
/// Set keypad backlight.
pub const SET_KEYBOARD_BACKLIGHT: u8 = 0x35;
/// Open the touch panel.
pub const OPEN_TP: u8 = 0x3A;
/// Close the touch panel.
pub const CLOSE_TP: u8 = 0x3B;
/// Query touch panel support.
pub const CHECK_TP_SUPPORT: u8 = 0x3C;
/// Touch coordinate event.
pub const GET_TOUCH_COORDINATE: u8 = 0x3E;
/// Configure the touch panel.
pub const SET_TOUCH_PARAMETER: u8 = 0x3F;
/// Open the magnetic stripe reader.
pub const OPEN_MAGNETIC_STRIPE_CARD: u8 = 0x40;
/// Close the magnetic stripe reader.
pub const CLOSE_MAGNETIC_STRIPE_CARD: u8 = 0x41;
/// Check for a swiped card.
pub const CHECK_MAGNETIC_STRIPE_CARD: u8 = 0x42;
/// Read magnetic track data.
pub const READ_MAGNETIC_STRIPE_CARD_DATA: u8 = 0x43;
/// Clear the magnetic track buffer.
pub const CLEAR_MAGNETIC_STRIPE_CARD_DATA: u8 = 0x44;
/// Format track information.
pub const FORMAT_MAGNETIC_STRIPE_CARD_DATA: u8 = 0x45;
/// Start a card search; results arrive as events.
pub const SEARCH_CARD_START: u8 = 0x46;
/// Card search result report.
pub const SEARCH_CARD_RESULT: u8 = 0x47;
/// Stop a card search.
pub const SEARCH_CARD_STOP: u8 = 0x48;
/// Open the contact IC card module.
pub const OPEN_IC_CARD_MODULE: u8 = 0x4A;
/// Close the contact IC card module.
pub const CLOSE_IC_CARD_MODULE: u8 = 0x4B;
/// IC card presence status.
pub const CHECK_IC_STATUS: u8 = 0x4C;
/// Power up and reset an IC card.
pub const IC_CARD_RESET: u8 = 0x4D;
/// Power an IC card down.
pub const IC_CARD_MODULE_POWER_OFF: u8 = 0x4E;
/// Exchange an APDU with a contact card.
pub const IC_CARD_SEND_APDU_COMMAND: u8 = 0x4F;
/// Open the contactless module.
pub const ICC_OPEN_MODULE: u8 = 0x50;
/// Close the contactless module.
pub const ICC_CLOSE_MODULE: u8 = 0x51;
/// Search for and activate a contactless card.
pub const ICC_SEARCH_CARD_ACTIVATION: u8 = 0x52;
/// Exchange an APDU with a contactless card.
pub const ICC_SEND_APDU_COMMAND: u8 = 0x53;
/// Authenticate a Mifare sector.
pub const MIFARE_CARD_AUTHENTICATION: u8 = 0x54;
/// Read, write or adjust a Mifare block.
pub const MIFARE_CARD_OPERATION: u8 = 0x55;
/// Open the barcode scanner.
pub const SCAN_OPEN: u8 = 0x5A;
/// Close the barcode scanner.
pub const SCAN_CLOSE: u8 = 0x5B;
/// Read scanned data.
pub const READ_SCAN_DATA: u8 = 0x5C;
/// Query printer support.
pub const CHECK_PRINTER_SUPPORT: u8 = 0x61;
/// Open the printer.
pub const PRINTER_OPEN: u8 = 0x62;
/// Close the printer.
pub const PRINTER_CLOSE: u8 = 0x63;
/// Query printer status.
pub const QUERY_PRINTER_STATUS: u8 = 0x64;
/// Set print density.
pub const SET_PRINTER_GRAY: u8 = 0x65;
/// Feed paper.
pub const PAPER_FEED: u8 = 0x6B;
/// Print bitmap data.
pub const PRINT_BITMAP_DATA: u8 = 0x6C;
/// Open the PIN pad.
pub const KEYPAD_OPEN_PASSWORD: u8 = 0x70;
/// Close the PIN pad.
pub const KEYPAD_CLOSE_PASSWORD: u8 = 0x71;
/// Read random bytes.
pub const KEYPAD_GET_RANDOM_NUMBER: u8 = 0x72;
/// Load a master key.
pub const KEYPAD_UPDATE_MASTER_KEY: u8 = 0x73;
/// Load a working key.
pub const KEYPAD_UPDATE_WORK_KEY: u8 = 0x74;
/// Encrypt data.
pub const KEYPAD_ENCRYPT_DATA: u8 = 0x75;
/// Encrypt track data.
pub const KEYPAD_ENCRYPT_MAGNETIC_STRIPE_DATA: u8 = 0x76;
/// Compute a MAC.
pub const KEYPAD_CALCULATE_MAC: u8 = 0x77;
/// Capture an online PIN.
pub const KEYPAD_INPUT_ONLINE_PIN: u8 = 0x78;
/// Generate an RSA key pair and export the public key.
pub const KEYPAD_GEN_RSA_KEY_PAIR: u8 = 0x7B;
/// Encrypt with the generated RSA private key.
pub const KEYPAD_ENCRYPT_RSA_PRIVATE_KEY: u8 = 0x7C;
/// Encrypt the hardware serial number.
pub const KEYPAD_ENCRYPT_HARDWARE_SERIAL_NUMBER: u8 = 0x7D;
/// Query tamper trigger status.
pub const KEYPAD_CHECK_TRIGGER_STATUS: u8 = 0x84;
/// Set tamper trigger status.
pub const KEYPAD_SET_TRIGGER_STATUS: u8 = 0x85;
/// Release a tamper trigger.
pub const KEYPAD_RELEASE_TRIGGER: u8 = 0x86;
/// Verify a stored key.
pub const KEYPAD_CHECK_KEY: u8 = 0x87;
/// SM3 hash.
pub const KEYPAD_SM3_HASH: u8 = 0x95;
/// DES encrypt or decrypt.
pub const KEYPAD_DES: u8 = 0x96;
/// AES encrypt or decrypt.
pub const KEYPAD_AES: u8 = 0x97;
/// SM4 encrypt or decrypt.
pub const KEYPAD_SM4: u8 = 0x98;
/// SM2 encrypt or decrypt.
pub const KEYPAD_SM2: u8 = 0x99;
/// SM2 sign.
pub const KEYPAD_SM2_SIGN: u8 = 0x9A;
/// SM2 verify.
pub const KEYPAD_SM2_VERIFY: u8 = 0x9B;
/// Internal authentication.
pub const INTERNAL_AUTH: u8 = 0xA0;
/// Download the hardware serial after external authentication.
pub const EXTERNAL_AUTH_DOWNLOAD_HARDWARE_SERIAL: u8 = 0xA1;
/// Unlock after external authentication.
pub const EXTERNAL_AUTH_UNLOCK: u8 = 0xA7;
/// Encrypt the chip ID after external authentication.
pub const EXTERNAL_AUTH_ENCRYPT_CHIP_ID: u8 = 0xA8;
/// Reset the bootloader after external authentication.
pub const EXTERNAL_AUTH_RESET_BOOT: u8 = 0xA9;
/// Begin a file download.
pub const FILE_DOWNLOAD_START: u8 = 0xAA;
/// Download a file block.
pub const FILE_DOWNLOAD: u8 = 0xAB;

/// Returns the symbolic name of a command code, or `"UNKNOWN"`.
pub fn command_name(code: u8) -> &'static str {
    match code {
        SET_COMM_MODE => "SET_COMM_MODE",
        GET_NETWORK_MODE => "GET_NETWORK_MODE",
        GET_SYSTEM_VERSION => "GET_SYSTEM_VERSION",
        GET_HARDWARE_SERIAL_NUMBER => "GET_HARDWARE_SERIAL_NUMBER",
        GET_DEVICE_MODEL => "GET_DEVICE_MODEL",
        GET_CUSTOMER_SERIAL_NUMBER => "GET_CUSTOMER_SERIAL_NUMBER",
        SET_CLOCK => "SET_CLOCK",
        GET_CLOCK => "GET_CLOCK",
        BEEP => "BEEP",
        BEEP_FREQUENCY => "BEEP_FREQUENCY",
        LED_ON => "LED_ON",
        LED_OFF => "LED_OFF",
        LED_FLASH => "LED_FLASH",
        SYSTEM_RESET => "SYSTEM_RESET",
        SYSTEM_SHUTDOWN => "SYSTEM_SHUTDOWN",
        SET_TERMINAL_SERIAL_NUMBER => "SET_TERMINAL_SERIAL_NUMBER",
        GET_CHIP_SERIAL_NUMBER => "GET_CHIP_SERIAL_NUMBER",
        ENABLE_SLEEP_MODE => "ENABLE_SLEEP_MODE",
        ENTER_BOOT_OR_QUERY_STATE => "ENTER_BOOT_OR_QUERY_STATE",
        OPEN_KEYBOARD => "OPEN_KEYBOARD",
        CLOSE_KEYBOARD => "CLOSE_KEYBOARD",
        READ_KEYBOARD_INPUT => "READ_KEYBOARD_INPUT",
        CLEAR_KEYBOARD_CACHE => "CLEAR_KEYBOARD_CACHE",
        SET_KEYBOARD_SOUND => "SET_KEYBOARD_SOUND",
        SET_KEYBOARD_BACKLIGHT => "SET_KEYBOARD_BACKLIGHT",
        OPEN_TP => "OPEN_TP",
        CLOSE_TP => "CLOSE_TP",
        CHECK_TP_SUPPORT => "CHECK_TP_SUPPORT",
        GET_TOUCH_COORDINATE => "GET_TOUCH_COORDINATE",
        SET_TOUCH_PARAMETER => "SET_TOUCH_PARAMETER",
        OPEN_MAGNETIC_STRIPE_CARD => "OPEN_MAGNETIC_STRIPE_CARD",
        CLOSE_MAGNETIC_STRIPE_CARD => "CLOSE_MAGNETIC_STRIPE_CARD",
        CHECK_MAGNETIC_STRIPE_CARD => "CHECK_MAGNETIC_STRIPE_CARD",
        READ_MAGNETIC_STRIPE_CARD_DATA => "READ_MAGNETIC_STRIPE_CARD_DATA",
        CLEAR_MAGNETIC_STRIPE_CARD_DATA => "CLEAR_MAGNETIC_STRIPE_CARD_DATA",
        FORMAT_MAGNETIC_STRIPE_CARD_DATA => "FORMAT_MAGNETIC_STRIPE_CARD_DATA",
        SEARCH_CARD_START => "SEARCH_CARD_START",
        SEARCH_CARD_RESULT => "SEARCH_CARD_RESULT",
        SEARCH_CARD_STOP => "SEARCH_CARD_STOP",
        OPEN_IC_CARD_MODULE => "OPEN_IC_CARD_MODULE",
        CLOSE_IC_CARD_MODULE => "CLOSE_IC_CARD_MODULE",
        CHECK_IC_STATUS => "CHECK_IC_STATUS",
        IC_CARD_RESET => "IC_CARD_RESET",
        IC_CARD_MODULE_POWER_OFF => "IC_CARD_MODULE_POWER_OFF",
        IC_CARD_SEND_APDU_COMMAND => "IC_CARD_SEND_APDU_COMMAND",
        ICC_OPEN_MODULE => "ICC_OPEN_MODULE",
        ICC_CLOSE_MODULE => "ICC_CLOSE_MODULE",
        ICC_SEARCH_CARD_ACTIVATION => "ICC_SEARCH_CARD_ACTIVATION",
        ICC_SEND_APDU_COMMAND => "ICC_SEND_APDU_COMMAND",
        MIFARE_CARD_AUTHENTICATION => "MIFARE_CARD_AUTHENTICATION",
        MIFARE_CARD_OPERATION => "MIFARE_CARD_OPERATION",
        SCAN_OPEN => "SCAN_OPEN",
        SCAN_CLOSE => "SCAN_CLOSE",
        READ_SCAN_DATA => "READ_SCAN_DATA",
        CHECK_PRINTER_SUPPORT => "CHECK_PRINTER_SUPPORT",
        PRINTER_OPEN => "PRINTER_OPEN",
        PRINTER_CLOSE => "PRINTER_CLOSE",
        QUERY_PRINTER_STATUS => "QUERY_PRINTER_STATUS",
        SET_PRINTER_GRAY => "SET_PRINTER_GRAY",
        PAPER_FEED => "PAPER_FEED",
        PRINT_BITMAP_DATA => "PRINT_BITMAP_DATA",
        KEYPAD_OPEN_PASSWORD => "KEYPAD_OPEN_PASSWORD",
        KEYPAD_CLOSE_PASSWORD => "KEYPAD_CLOSE_PASSWORD",
        KEYPAD_GET_RANDOM_NUMBER => "KEYPAD_GET_RANDOM_NUMBER",
        KEYPAD_UPDATE_MASTER_KEY => "KEYPAD_UPDATE_MASTER_KEY",
        KEYPAD_UPDATE_WORK_KEY => "KEYPAD_UPDATE_WORK_KEY",
        KEYPAD_ENCRYPT_DATA => "KEYPAD_ENCRYPT_DATA",
        KEYPAD_ENCRYPT_MAGNETIC_STRIPE_DATA => "KEYPAD_ENCRYPT_MAGNETIC_STRIPE_DATA",
        KEYPAD_CALCULATE_MAC => "KEYPAD_CALCULATE_MAC",
        KEYPAD_INPUT_ONLINE_PIN => "KEYPAD_INPUT_ONLINE_PIN",
        KEYPAD_GEN_RSA_KEY_PAIR => "KEYPAD_GEN_RSA_KEY_PAIR",
        KEYPAD_ENCRYPT_RSA_PRIVATE_KEY => "KEYPAD_ENCRYPT_RSA_PRIVATE_KEY",
        KEYPAD_ENCRYPT_HARDWARE_SERIAL_NUMBER => "KEYPAD_ENCRYPT_HARDWARE_SERIAL_NUMBER",
        KEYPAD_CHECK_TRIGGER_STATUS => "KEYPAD_CHECK_TRIGGER_STATUS",
        KEYPAD_SET_TRIGGER_STATUS => "KEYPAD_SET_TRIGGER_STATUS",
        KEYPAD_RELEASE_TRIGGER => "KEYPAD_RELEASE_TRIGGER",
        KEYPAD_CHECK_KEY => "KEYPAD_CHECK_KEY",
        KEYPAD_SM3_HASH => "KEYPAD_SM3_HASH",
        KEYPAD_DES => "KEYPAD_DES",
        KEYPAD_AES => "KEYPAD_AES",
        KEYPAD_SM4 => "KEYPAD_SM4",
        KEYPAD_SM2 => "KEYPAD_SM2",
        KEYPAD_SM2_SIGN => "KEYPAD_SM2_SIGN",
        KEYPAD_SM2_VERIFY => "KEYPAD_SM2_VERIFY",
        INTERNAL_AUTH => "INTERNAL_AUTH",
        EXTERNAL_AUTH_DOWNLOAD_HARDWARE_SERIAL => "EXTERNAL_AUTH_DOWNLOAD_HARDWARE_SERIAL",
        EXTERNAL_AUTH_UNLOCK => "EXTERNAL_AUTH_UNLOCK",
        EXTERNAL_AUTH_ENCRYPT_CHIP_ID => "EXTERNAL_AUTH_ENCRYPT_CHIP_ID",
        EXTERNAL_AUTH_RESET_BOOT => "EXTERNAL_AUTH_RESET_BOOT",
        FILE_DOWNLOAD_START => "FILE_DOWNLOAD_START",
        FILE_DOWNLOAD => "FILE_DOWNLOAD",
        _ => "UNKNOWN",
    }
}

/// Display adapter rendering a command code as `NAME(0xNN)` for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandName(pub u8);

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#04x})", command_name(self.0), self.0)
    }
}
