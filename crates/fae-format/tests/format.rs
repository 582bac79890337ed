//! End-to-end codec tests: encode an image, walk it back, and check that
//! every chunk boundary and metadata field survives the trip.

use fae_format::{FaeImage, MINIMAL_BYTES, MPU_ALIGNMENT, RelocationTable, SectionSizes, encode};

#[test]
fn test_reference_layout() {
    // CRT0 = 16 zero bytes; one relocation table with a single offset;
    // 12 partition bytes. Raw body is 40 bytes, so the image rounds up to
    // 96 bytes with the footer in the reserved tail.
    let crt0 = vec![0u8; 16];
    let sizes = SectionSizes {
        entrypoint: 4,
        rom_size: 8,
        rom_ram_size: 0,
        got_size: 4,
        ram_size: 12,
    };
    let table = RelocationTable::new(vec![0]);
    let partition = vec![0xCD; 12];

    let image = encode(&crt0, &sizes, &[table], &partition).unwrap();
    assert_eq!(image.len(), 96);

    let parsed = FaeImage::parse(&image).unwrap();
    assert_eq!(parsed.crt0, 0..16);
    assert_eq!(parsed.relocations, vec![0]);
    assert_eq!(parsed.rom_ram, None);
    assert_eq!(parsed.rom.clone().map(|r| r.len()), Some(8));
    assert_eq!(parsed.got.clone().map(|r| r.len()), Some(4));
    assert_eq!(parsed.bss_size, 12);
    assert_eq!(parsed.footer.entrypoint, 4);
    assert_eq!(parsed.footer.crt0_size, 16);
}

#[test]
fn test_round_trip_preserves_inputs() {
    let crt0: Vec<u8> = (0..48).map(|i| i as u8).collect();
    let sizes = SectionSizes {
        entrypoint: 0x20,
        rom_size: 0x40,
        rom_ram_size: 0x10,
        got_size: 0x0C,
        ram_size: 0x80,
    };
    let table = RelocationTable::new(vec![0x1000, 0x1004, 0x2000]);
    let partition: Vec<u8> = (0..0x5C).map(|i| (i * 7) as u8).collect();

    let image = encode(&crt0, &sizes, &[table.clone()], &partition).unwrap();
    assert_eq!(image.len() % MPU_ALIGNMENT, 0);
    assert!(image.len() >= MINIMAL_BYTES);

    let parsed = FaeImage::parse(&image).unwrap();
    assert_eq!(&image[parsed.crt0.clone()], crt0.as_slice());
    assert_eq!(parsed.relocations, table.offsets);
    assert_eq!(parsed.footer.rom_size, sizes.rom_size);
    assert_eq!(parsed.footer.rom_ram_size, sizes.rom_ram_size);
    assert_eq!(parsed.footer.got_size, sizes.got_size);
    assert_eq!(parsed.footer.ram_size, sizes.ram_size);
    assert_eq!(parsed.footer.entrypoint, sizes.entrypoint);

    // Chunks tile the partition in data, code, GOT order.
    let data_chunk = parsed.rom_ram.unwrap();
    let code_chunk = parsed.rom.unwrap();
    let got_chunk = parsed.got.unwrap();
    assert_eq!(data_chunk.end, code_chunk.start);
    assert_eq!(code_chunk.end, got_chunk.start);
    assert_eq!(&image[data_chunk.start..got_chunk.end], partition.as_slice());
}

#[test]
fn test_mutating_length_or_field_is_rejected() {
    let crt0 = vec![0u8; 16];
    let sizes = SectionSizes::default();
    let image = encode(
        &crt0,
        &sizes,
        &[RelocationTable::default()],
        &[],
    )
    .unwrap();
    assert!(FaeImage::parse(&image).is_ok());

    // Appending bytes breaks the self-description both ways: the footer
    // moves (magic fails) and the size field no longer matches.
    let mut grown = image.clone();
    grown.extend_from_slice(&[0xFF; 32]);
    assert!(FaeImage::parse(&grown).is_err());

    let mut flipped = image;
    flipped[16] ^= 0xFF;
    assert!(FaeImage::parse(&flipped).is_err());
}
