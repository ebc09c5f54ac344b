#![no_main]

use hookline_timeline::Check;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // 파싱된 체크는 Display 결과로 다시 파싱되어도 같아야 한다
    if let Ok(check) = text.parse::<Check>() {
        let reparsed: Check = check
            .to_string()
            .parse()
            .expect("rendered check should parse");
        assert_eq!(reparsed, check);
    }
});
