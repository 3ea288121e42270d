use gdxfile::container::GdxFile;
use gdxfile::symbols::DataType;

fn temp_path(name: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("gdx_cp_{}_{}", std::process::id(), name));
    p.to_string_lossy().into_owned()
}

fn write_records(path: &str, compr: i32) {
    let mut gdx = GdxFile::new();
    assert!(gdx.open_write_ex(path, "compress_test", compr));
    assert!(gdx.data_write_str_start("big", "lots of records", 2, DataType::Parameter, 0));
    for i in 0..60 {
        for j in 0..40 {
            let keys = [format!("row{:03}", i), format!("col{:03}", j)];
            let k: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
            assert!(gdx.data_write_str(&k, &[(i * 40 + j) as f64]));
        }
    }
    assert!(gdx.data_write_done());
    assert_eq!(gdx.close(), 0);
}

fn read_records(path: &str) -> Vec<(i32, i32, u64)> {
    let mut gdx = GdxFile::new();
    assert!(gdx.open_read(path));
    let nr_recs = gdx.data_read_raw_start(1).unwrap();
    assert_eq!(nr_recs, 60 * 40);
    let mut out = Vec::new();
    let mut keys = [0i32; 20];
    let mut vals = [0.0f64; 5];
    while gdx.data_read_raw(&mut keys, &mut vals).is_some() {
        out.push((keys[0], keys[1], vals[0].to_bits()));
    }
    assert_eq!(gdx.get_last_error(), 0);
    gdx.close();
    out
}

#[test]
fn test_compressed_roundtrip_matches_uncompressed() {
    let plain = temp_path("plain.gdx");
    let packed = temp_path("packed.gdx");
    write_records(&plain, 0);
    write_records(&packed, 1);

    // compression pays off on this many records
    let plain_size = std::fs::metadata(&plain).unwrap().len();
    let packed_size = std::fs::metadata(&packed).unwrap().len();
    assert!(packed_size < plain_size);

    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&packed));
        let (ver, compr) = gdx.file_info();
        assert_eq!(ver, 7);
        assert_eq!(compr, 1);
        gdx.close();
    }

    let a = read_records(&plain);
    let b = read_records(&packed);
    assert_eq!(a.len(), 60 * 40);
    assert_eq!(a, b);

    std::fs::remove_file(&plain).unwrap();
    std::fs::remove_file(&packed).unwrap();
}

#[test]
fn test_compressed_universe_and_texts() {
    let path = temp_path("packed2.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "compress_test", 1));
        assert!(gdx.data_write_str_start("s", "a set", 1, DataType::Set, 0));
        for i in 0..500 {
            let name = format!("element_number_{:04}", i);
            assert!(gdx.data_write_str(&[name.as_str()], &[0.0]));
        }
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let (sy_cnt, uel_cnt) = gdx.system_info();
        assert_eq!(sy_cnt, 1);
        assert_eq!(uel_cnt, 500);
        let (name, _) = gdx.um_uel_get(499).unwrap();
        assert_eq!(name, "element_number_0498");
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}
