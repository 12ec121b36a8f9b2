use super::types::{SearchQuery, SearchResult};

pub fn build_system_prompt() -> String {
    r#"Du bereitest einen Verkäufer von musikfürfirmen.de auf ein Erstgespräch mit einem Firmenkunden vor.

musikfürfirmen.de bietet:
- Live-Bands (Jazz, Pop, Rock, Coverband, Akustik)
- DJs für Firmenevents
- Komplette Veranstaltungstechnik (Ton, Licht, Bühne)
- Kombinationspakete Band + DJ
- Für alle Unternehmensgrößen und Anlässe

Typische Anlässe: Sommerfeste, Weihnachtsfeiern, Firmenjubiläen, Produktlaunches, Teamevents, Kundenevents, Messen, Awards-Abende.

Deine Aufgabe: Hilf dem Verkäufer, den Kunden wirklich zu verstehen (Unternehmenskultur, typische Eventgrößen, Anlässe und Wünsche), damit er das richtige Angebot machen kann.

Extrahiere NUR verifizierte Fakten aus den Suchergebnissen. Antworte ausschließlich mit validem JSON."#
        .to_string()
}

/// Search hits grouped under one heading per query
pub fn format_snippets(sections: &[(SearchQuery, Vec<SearchResult>)]) -> String {
    let mut snippets = String::new();
    for (index, (query, results)) in sections.iter().enumerate() {
        if index > 0 {
            snippets.push('\n');
        }
        snippets.push_str(&format!("## {}\n", query.heading()));
        for result in results {
            snippets.push_str(&format!(
                "- [{}]({}): {}\n",
                result.title, result.url, result.content
            ));
        }
    }
    snippets
}

pub fn build_user_prompt(company: &str, snippets: &str) -> String {
    format!(
        r#"Analysiere diese Suchergebnisse über '{company}' und erstelle ein Event-Sales-Briefing.

{snippets}

Antworte als JSON:
{{
  "industry": "Branche in 2-3 Worten oder null",
  "employee_count": "Mitarbeiterzahl oder null",
  "website": "URL oder null",
  "location": "Hauptstandort oder null",
  "description": "1-2 Sätze: Wer ist das Unternehmen, welche Unternehmenskultur/Werte erkennbar? Aus Event-Perspektive relevant (z.B. modern, traditionell, international, familienorientiert)",
  "financials": "Nur wenn aus Suchergebnissen belegbar: Umsatz, Gewinn/Verlust, Marketingbudget und ob das Unternehmen finanziell gut aufgestellt ist. Wenn nichts Belastbares gefunden: null",
  "call_prep": "2-3 Sätze: Was sollte der Verkäufer über dieses Unternehmen wissen, bevor er anruft? Welche Anlässe für Events sind bei dieser Firmengröße/Branche typisch?",
  "talking_points": [
    "Frage die hilft den konkreten Event-Bedarf zu verstehen (Anlass, Datum, Ort)",
    "Frage zu Erwartungen an Musik/Atmosphäre",
    "Frage zur Gästezahl oder ob es eine interne oder gemischte Veranstaltung ist"
  ],
  "potential_needs": "Welches musikfürfirmen.de-Paket passt wahrscheinlich und warum?",
  "recent_news": [{{"title": "...", "url": "..."}}],
  "past_events": [{{"title": "...", "url": "..."}}],
  "sources": ["url1", "url2"]
}}

KRITISCH für "financials": Nur echte Zahlen aus den Suchergebnissen verwenden. Keine Schätzungen. Wenn keine Finanzdaten in den Ergebnissen vorhanden sind: null."#
    )
}
