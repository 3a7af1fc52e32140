//! Print the J1850 lookup table and a run of Profile 11 protected frames.

use e2e_p11::crc_ops::Crc8J1850;
use e2e_p11::profile11::{Profile11, Profile11Config, Profile11IdMode};
use e2e_p11::{E2EProfile, E2EResult};

const TABLE_COLUMNS: usize = 16;
const FRAME_COUNT: usize = 15;

fn hex_line(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> E2EResult<()> {
    let crc = Crc8J1850::new();
    println!("J1850 CRC table:");
    for row in crc.table().chunks(TABLE_COLUMNS) {
        println!("{}", hex_line(row));
    }
    println!();

    let config = Profile11Config {
        data_id: 0x123,
        data_length: 64,
        mode: Profile11IdMode::Both,
        counter_offset: 8,
        crc_offset: 0,
        nibble_offset: 12,
        max_delta_counter: 3,
    };
    let mut profile = Profile11::with_crc(config, crc)?;
    let frame = [0u8; 8];

    println!("Protected frame:");
    for _ in 0..FRAME_COUNT {
        println!("{}", hex_line(&profile.protect(&frame)?));
    }
    Ok(())
}
