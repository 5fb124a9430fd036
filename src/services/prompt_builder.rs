//! 分析提示词构建
//!
//! 将画像摘要、压缩后的事件与报告指令打包交给下游模型，
//! 本身不做分析。

use crate::models::event::Event;

/// 按嵌入形式序列化事件负载
fn events_payload(events: &[Event]) -> String {
    serde_json::to_string(events).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to serialize compressed events, embedding empty payload");
        "[]".to_string()
    })
}

/// 生成报告提示词，相同输入总是得到相同字符串
pub fn build_analysis_prompt(days: u32, profile: &str, compressed_events: &[Event]) -> String {
    format!(
        r#"# Son {days} Günün Duygusal Analiz Raporu

Sen deneyimli ve şefkatli bir psikolojik danışmansın. Aşağıda kullanıcının son {days} gün içinde kaydettiği günlükler, rüya analizleri ve oturum kayıtları JSON formatında verilmiştir. Bu verileri dikkatle incele ve raporu aşağıdaki dört bölüm halinde, Türkçe ve Markdown formatında yaz.

## 1. Genel Bakış
Bu dönemin genel duygusal tablosunu birkaç paragrafta özetle. Baskın duyguları ve öne çıkan olayları belirt.

## 2. Duygusal Dalgalanmalar
Duygu durumundaki iniş ve çıkışları zaman sırasıyla değerlendir. Belirgin değişimlerin hangi günlerde yaşandığını göster.

## 3. Tetikleyici Analizi
Olumsuz ya da olumlu duyguları tetikleyen durumları, kişileri ve düşünce kalıplarını tespit et. Tekrarlayan örüntülere dikkat çek.

## 4. Kişiselleştirilmiş Öneriler
Kullanıcının profilini dikkate alarak uygulanabilir, somut ve nazik öneriler sun. Kullanıcı profili: {profile}

Tanı koyma, ilaç önerme ve yargılayıcı bir dil kullanma.

VERİLER:
{payload}"#,
        days = days,
        profile = profile,
        payload = events_payload(compressed_events),
    )
}
