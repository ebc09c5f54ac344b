#![no_main]

use hookline_timeline::parse_event_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    // 파싱에 성공한 이벤트는 같은 줄로 다시 직렬화되어야 한다
    if let Some(event) = parse_event_line(line) {
        let rendered = event.to_string();
        assert_eq!(parse_event_line(&rendered), Some(event));
    }
});
