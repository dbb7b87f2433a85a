/// Stylesheet embedded in every report
pub(crate) const REPORT_CSS: &str = r#"
        body { font-family: 'Calibri', sans-serif; margin: 40px; line-height: 1.6; color: #333; }
        .header { text-align: center; border-bottom: 3px solid #F97316; padding-bottom: 20px; margin-bottom: 30px; }
        .title { font-size: 28px; font-weight: bold; color: #EF4444; margin-bottom: 10px; }
        .subtitle { font-size: 18px; color: #666; margin-bottom: 5px; }
        .branding { font-size: 14px; color: #F97316; font-weight: bold; margin-top: 10px; }
        .section { margin-bottom: 35px; page-break-inside: avoid; }
        .section-title { font-size: 20px; font-weight: bold; color: #EF4444; border-bottom: 2px solid #F97316; padding-bottom: 8px; margin-bottom: 20px; }
        .subsection-title { font-size: 16px; font-weight: bold; color: #333; margin-bottom: 10px; margin-top: 20px; }
        .narrative-text { font-size: 12px; color: #333; line-height: 1.7; margin-bottom: 15px; text-align: justify; }
        .score-box { background: linear-gradient(135deg, #FFF7ED 0%, #FED7AA 100%); border: 2px solid #F97316; padding: 20px; border-radius: 12px; margin-bottom: 25px; text-align: center; }
        .score-number { font-size: 48px; font-weight: bold; color: #EF4444; margin-bottom: 10px; }
        .score-label { font-size: 14px; color: #666; font-weight: bold; }
        .compliance-grid { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 20px; margin-bottom: 25px; }
        .compliance-item { background: #FEF2F2; padding: 15px; border-radius: 8px; border-left: 6px solid #EF4444; }
        .compliance-item h4 { margin: 0 0 8px 0; font-size: 14px; font-weight: bold; color: #333; }
        .compliance-item p { margin: 0; font-size: 12px; color: #666; }
        .section-score { font-size: 24px; font-weight: bold; float: right; margin-top: -5px; }
        .status-compliant { color: #10B981; }
        .status-update, .status-needs-update { color: #F59E0B; }
        .status-critical { color: #EF4444; }
        .highlights-box { background: linear-gradient(135deg, #ECFDF5 0%, #D1FAE5 100%); border: 2px solid #10B981; padding: 20px; border-radius: 12px; margin-bottom: 25px; }
        .gaps-box { background: linear-gradient(135deg, #FEF2F2 0%, #FECACA 100%); border: 2px solid #EF4444; padding: 20px; border-radius: 12px; margin-bottom: 25px; }
        .recommendations { background: #FFF7ED; padding: 25px; border-radius: 12px; border: 2px solid #F97316; margin-bottom: 25px; }
        .recommendation-item { background: white; padding: 18px; margin-bottom: 15px; border-radius: 8px; border-left: 6px solid #F97316; }
        .recommendation-item h4 { margin: 0 0 10px 0; font-size: 14px; font-weight: bold; color: #EF4444; }
        .recommendation-item p { margin: 0; font-size: 12px; color: #333; line-height: 1.6; }
        .priority-high { border-left-color: #EF4444 !important; }
        .priority-medium { border-left-color: #F59E0B !important; }
        .priority-low { border-left-color: #10B981 !important; }
        .narrative-section { background: #F8FAFC; padding: 25px; border-radius: 12px; margin-bottom: 25px; border: 1px solid #E2E8F0; }
        .narrative-section h3 { color: #EF4444; margin-bottom: 15px; font-size: 18px; }
        ul { padding-left: 25px; }
        li { margin-bottom: 8px; font-size: 12px; color: #333; line-height: 1.5; }
        .footer { margin-top: 50px; text-align: center; border-top: 3px solid #F97316; padding-top: 25px; }
        .disclaimer { font-size: 10px; color: #666; margin-top: 15px; }
        .page-break { page-break-before: always; }
"#;
