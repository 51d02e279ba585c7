use pretty_assertions::assert_eq;

use super::*;
use crate::ErrorKind;

fn text(content: &str) -> DeltaEvent {
    DeltaEvent::TextDelta {
        content: content.to_owned(),
    }
}

#[tokio::test]
async fn test_memory_sink_keeps_order() {
    let sink = MemorySink::new();

    sink.append(text("a")).await.unwrap();
    sink.append(text("b")).await.unwrap();

    assert_eq!(sink.events(), vec![text("a"), text("b")]);
}

#[tokio::test]
async fn test_channel_sink_forwards_events() {
    let (sink, mut receiver) = ChannelSink::new("gen-1", 4);

    sink.append(text("a")).await.unwrap();
    sink.append(text("b")).await.unwrap();
    drop(sink);

    assert_eq!(receiver.recv().await, Some(text("a")));
    assert_eq!(receiver.recv().await, Some(text("b")));
    assert_eq!(receiver.recv().await, None);
}

#[tokio::test]
async fn test_channel_sink_closed_by_client() {
    let (sink, receiver) = ChannelSink::new("gen-1", 4);
    drop(receiver);

    let error = sink.append(text("a")).await.unwrap_err();

    assert_eq!(error, Error::SinkClosed("gen-1".to_owned()));
    assert_eq!(error.kind(), ErrorKind::Cancelled);
}

#[tokio::test]
async fn test_json_lines_sink() {
    let sink = JsonLinesSink::new(vec![]);

    sink.append(text("Hello")).await.unwrap();
    sink.append(DeltaEvent::CodeDelta {
        content: "x = \"1\"\n".to_owned(),
    })
    .await
    .unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(
        output,
        concat!(
            r#"{"type":"text-delta","content":"Hello"}"#,
            "\n",
            r#"{"type":"code-delta","content":"x = \"1\"\n"}"#,
            "\n",
        )
    );
}
