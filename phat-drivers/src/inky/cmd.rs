//! Controller command codes and fixed register values

pub struct Cmd;
impl Cmd {
    pub const DRIVER_OUTPUT_CTRL: u8 = 0x01;
    pub const SOURCE_VOLTAGE_CTRL: u8 = 0x04;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const MASTER_ACTIVATE: u8 = 0x20;
    pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;
    pub const WRITE_BW_DATA: u8 = 0x24;
    pub const WRITE_RED_DATA: u8 = 0x26;
    pub const WRITE_VCOM_REG: u8 = 0x2C;
    pub const WRITE_LUT_REG: u8 = 0x32;
    pub const DUMMY_LINE_PERIOD: u8 = 0x3A;
    pub const GATE_LINE_WIDTH: u8 = 0x3B;
    pub const BORDER_WAVEFORM_CTRL: u8 = 0x3C;
    pub const SET_RAMXPOS: u8 = 0x44;
    pub const SET_RAMYPOS: u8 = 0x45;
    pub const SET_RAMX_COUNTER: u8 = 0x4E;
    pub const SET_RAMY_COUNTER: u8 = 0x4F;
    pub const ANALOG_BLOCK_CTRL: u8 = 0x74;
    pub const DIGITAL_BLOCK_CTRL: u8 = 0x75;
}

pub struct Flag;
impl Flag {
    pub const ANALOG_BLOCK: u8 = 0x54;
    /// Sent by the vendor board, undocumented
    pub const DIGITAL_BLOCK: u8 = 0x3B;
    pub const DUMMY_LINE_PERIOD: u8 = 0x07;
    pub const GATE_LINE_WIDTH: u8 = 0x04;
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0b11;
    pub const SOURCE_VOLTAGE: [u8; 3] = [0x2D, 0xB2, 0x22];
    /// About -1.5 V
    pub const VCOM: u8 = 0x3C;
    pub const BORDER_WAVEFORM_DEFAULT: u8 = 0x00;
    pub const DISPLAY_MODE_1: u8 = 0xC7;
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01;
}
